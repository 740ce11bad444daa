//! High-level IR (HIR): the action model.
//!
//! Each parsed Java file is lowered into a [`SourceUnit`]: a framework-neutral
//! list of browser actions per test and helper method. [`link`] then resolves
//! the calls between units and produces the [`ActionModel`] the emitter reads.
//!
//! ## Stages
//!
//! ```text
//! SyntaxFile                ← parsed Java source (per file)
//!     │
//!     ▼
//! extract(file)             ← SourceUnit with actions (per file, parallel)
//!     │
//!     ▼
//! link(units)               ← ActionModel with resolved call sites
//! ```

mod action;
mod diagnostics;
mod extract;
mod model;
mod resolve;

pub use action::{
    Action, ActionKind, AssertKind, BinaryOp, Binding, CallSiteId, Condition, DelegateCall,
    DelegateTarget, ElementBinding, ElementOrigin, ElementQuery, ElementRef, Expr, HistoryOp,
    InteractOp, LifecycleOp, MethodBody, PageQuery, Provenance, Strategy, UnaryOp, ValueMethod,
    WaitTarget,
};
pub use diagnostics::{Diagnostic, DiagnosticCollector, RelatedInfo, Severity, codes};
pub use extract::extract;
pub(crate) use extract::is_driver_type;
pub use model::{
    CallSiteKind, CallSiteRef, ContextEntry, ContextValue, FieldDef, FieldKind, Import,
    LocatorDef, Member, MethodDef, MethodRole, PageObjectModel, ParamDef, SourceUnit,
    TestCase, TestContext, TestFramework, UnitKind,
};
pub use resolve::{
    ActionModel, CallSite, LinkError, Resolution, ResolveResult, ResolvedTarget, Resolver,
    ScopeVisibility, UnitId, UnitIndex, link,
};
