//! The `Options` struct: explicit, caller-supplied configuration.
//!
//! Per Design Notes (b), platform-bug guards are plain `bool` fields here, never compile-time
//! constants — the resolver/rewriter read them through a reference, so a single process can run
//! the core against more than one `Options` (e.g. when shrinking several outputs for different
//! target platform levels in the same invocation).

/// The bytecode format the output is ultimately encoded to; affects the rewriter's switch-size
/// model (class-file imposes a per-entry stack-map penalty that DEX does not) per §4.D.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OutputMode {
	ClassFile,
	Dex,
}

#[derive(Debug, Clone)]
pub struct Options {
	pub output_mode: OutputMode,
	/// Gates the widened reflective-instantiation handling described in §4.E's "Reflective entry
	/// points" subsection: recognized patterns also populate the instantiated set, not just live.
	pub compatibility_mode: bool,
	/// A platform-bug guard: some old VM builds miscompile `lcmp` chains; when set, the rewriter
	/// avoids the const-splitting transformations that would otherwise trigger it.
	pub can_have_cmp_long_bug: bool,
}

impl Default for Options {
	fn default() -> Options {
		Options {
			output_mode: OutputMode::ClassFile,
			compatibility_mode: false,
			can_have_cmp_long_bug: false,
		}
	}
}
