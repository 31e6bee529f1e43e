//! Resolution and lookup results: the data model's "Resolution result" and "Lookup result" sum
//! types. Resolutions never throw — every outcome, success or failure, is one of these values.

use app_model::interning::{MethodId, TypeId};

/// Which of the three collaborating inputs a single-resolution's holder came from — mirrors
/// [`app_model::class::ClassOrigin`] but is re-stated here so a caller matching on a
/// `ResolutionResult` doesn't need to pull in `app_model::class` just to read it off.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ResolutionOrigin {
	Program,
	Classpath,
	Library,
}

/// Why a resolution failed, carrying the contributing methods needed to explain the failure to
/// later reachability tracing (§4.B "Failure semantics").
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionFailure {
	ClassNotFound(TypeId),
	NoSuchMethod { holder: TypeId },
	IncompatibleClassChange { contributors: Vec<MethodId> },
	IllegalAccessOrNoSuchMethod { contributors: Vec<MethodId> },
}

/// The outcome of resolving a symbolic method reference against an initial resolution holder.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionResult {
	Single {
		holder: TypeId,
		method: MethodId,
		origin: ResolutionOrigin,
	},
	/// `clone()` invoked on an array type: never a single resolution, per the boundary behavior
	/// in §8.
	ArrayClone,
	Failed(ResolutionFailure),
	/// One program-or-classpath result combined with library results and failures — occurs when
	/// the same symbolic reference resolves differently depending on which input a caller sees
	/// the class through.
	Multi {
		primary: Box<ResolutionResult>,
		library_results: Vec<ResolutionResult>,
		failures: Vec<ResolutionFailure>,
	},
}

impl ResolutionResult {
	pub fn is_success(&self) -> bool {
		!matches!(self, ResolutionResult::Failed(_))
	}

	/// The single method this result ultimately names, if it names exactly one (true for
	/// `Single` and for a `Multi` whose primary is itself a `Single`).
	pub fn single_method(&self) -> Option<MethodId> {
		match self {
			ResolutionResult::Single { method, .. } => Some(*method),
			ResolutionResult::Multi { primary, .. } => primary.single_method(),
			_ => None,
		}
	}
}

/// An access-override pair: a package-private candidate encountered during a single-receiver
/// lookup that was superseded by a wider (public/protected) override found further up the
/// hierarchy, per §4.B's "widening override" rule.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AccessOverride {
	pub package_private_candidate: MethodId,
	pub widening_override: MethodId,
}

/// One concrete runtime target of a virtual invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchTarget {
	Method {
		holder: TypeId,
		method: MethodId,
		access_override: Option<AccessOverride>,
	},
	Lambda {
		/// The SAM interface method the symbolic invocation targeted.
		descriptor: MethodId,
		implementation: MethodId,
	},
}

/// The set of concrete runtime targets for a virtual invocation, plus whether that set is known
/// to be exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupResult {
	pub targets: Vec<DispatchTarget>,
	/// `true` iff every runtime target is in `targets`; `false` means `targets` is only a subset
	/// of the possible runtime targets (§8 "Dispatch completeness").
	pub complete: bool,
}

impl LookupResult {
	pub fn empty(complete: bool) -> LookupResult {
		LookupResult { targets: Vec::new(), complete }
	}
}
