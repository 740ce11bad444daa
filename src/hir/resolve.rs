//! Linking: resolving delegate and instantiation sites across units.
//!
//! `link` takes every extracted [`SourceUnit`] and produces an [`ActionModel`]:
//! the units in a stable order plus, for each call site, the unit and member it
//! refers to.
//!
//! ## Key Data Structures
//!
//! - [`ScopeVisibility`] - Per-unit map of the type names it can see
//! - [`UnitIndex`] - All units by qualified and simple name, with their visibility maps
//! - [`Resolver`] - Site-by-site resolution against the index

use std::fmt::Write as _;
use std::sync::Arc;

use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;
use thiserror::Error;
use tracing::{debug, trace};

use super::action::CallSiteId;
use super::diagnostics::{Diagnostic, codes};
use super::model::{CallSiteKind, CallSiteRef, MethodDef, MethodRole, SourceUnit};
use crate::base::Span;

// ============================================================================
// LINK ERRORS
// ============================================================================

/// A failure that stops the whole run.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("{unit}: ambiguous reference `{name}` (candidates: {})", .candidates.join(", "))]
    Ambiguous {
        unit: Arc<str>,
        span: Option<Span>,
        name: SmolStr,
        candidates: Vec<SmolStr>,
    },
    #[error("{unit}: unresolved reference `{name}`")]
    Unresolved {
        unit: Arc<str>,
        span: Option<Span>,
        name: SmolStr,
    },
    #[error("{unit}: circular delegation: {path}")]
    Cycle {
        unit: Arc<str>,
        span: Option<Span>,
        path: String,
    },
}

impl LinkError {
    pub fn unit(&self) -> &Arc<str> {
        match self {
            LinkError::Ambiguous { unit, .. }
            | LinkError::Unresolved { unit, .. }
            | LinkError::Cycle { unit, .. } => unit,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, span, message) = match self {
            LinkError::Ambiguous {
                span,
                name,
                candidates,
                ..
            } => {
                // Candidates that are whole units mean the input held the same class twice
                let code = if candidates.iter().all(|c| c == name) {
                    codes::DUPLICATE_UNIT
                } else {
                    codes::AMBIGUOUS_REFERENCE
                };
                let message = format!(
                    "ambiguous reference `{name}` (candidates: {})",
                    candidates.join(", ")
                );
                (code, span, message)
            }
            LinkError::Unresolved { span, name, .. } => (
                codes::UNRESOLVED_REFERENCE,
                span,
                format!("unresolved reference `{name}`"),
            ),
            LinkError::Cycle { span, path, .. } => (
                codes::CIRCULAR_DELEGATION,
                span,
                format!("circular delegation: {path}"),
            ),
        };
        let diagnostic = Diagnostic::error(self.unit().clone(), message).with_code(code);
        match span {
            Some(span) => diagnostic.with_span(*span),
            None => diagnostic,
        }
    }
}

pub type Result<T> = std::result::Result<T, LinkError>;

// ============================================================================
// ACTION MODEL
// ============================================================================

/// Position of a unit in [`ActionModel::units`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(pub u32);

impl UnitId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A call site, globally identified
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallSite {
    pub unit: UnitId,
    pub site: CallSiteId,
}

/// What a call site refers to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The unit declaring the target
    pub unit: UnitId,
    pub target: ResolvedTarget,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedTarget {
    /// Index into the target unit's members
    Method(usize),
    /// A declared constructor, or `None` for the implicit no-argument one
    Constructor(Option<usize>),
}

/// Every unit of a run, linked.
#[derive(Clone, Debug, Default)]
pub struct ActionModel {
    units: Vec<SourceUnit>,
    by_name: IndexMap<SmolStr, UnitId>,
    resolved: FxHashMap<CallSite, Resolution>,
    dependencies: Vec<Vec<UnitId>>,
}

impl ActionModel {
    /// Units ordered by qualified name
    pub fn units(&self) -> &[SourceUnit] {
        &self.units
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, &SourceUnit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, unit)| (UnitId(i as u32), unit))
    }

    pub fn unit(&self, id: UnitId) -> Option<&SourceUnit> {
        self.units.get(id.index())
    }

    pub fn unit_id(&self, qualified_name: &str) -> Option<UnitId> {
        self.by_name.get(qualified_name).copied()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Resolution of a delegate or instantiation site in `unit`
    pub fn resolution(&self, unit: UnitId, site: CallSiteId) -> Option<&Resolution> {
        self.resolved.get(&CallSite { unit, site })
    }

    /// The method a resolution points at. `None` for implicit constructors.
    pub fn method(&self, resolution: &Resolution) -> Option<&MethodDef> {
        let unit = self.unit(resolution.unit)?;
        match resolution.target {
            ResolvedTarget::Method(index) | ResolvedTarget::Constructor(Some(index)) => {
                unit.method_at(index)
            }
            ResolvedTarget::Constructor(None) => None,
        }
    }

    /// Other units `unit` calls into or instantiates, in unit order
    pub fn dependencies(&self, unit: UnitId) -> &[UnitId] {
        self.dependencies
            .get(unit.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of resolved call sites across all units
    pub fn resolved_count(&self) -> usize {
        self.resolved.len()
    }
}

// ============================================================================
// SCOPE VISIBILITY
// ============================================================================

/// The project type names visible from one unit.
///
/// Built once per unit from its package and imports. Library imports are kept
/// as `None` so that an explicitly imported library type shadows project types
/// of the same simple name.
#[derive(Clone, Debug, Default)]
pub struct ScopeVisibility {
    /// The unit this visibility applies to.
    scope: SmolStr,
    /// Single-type imports. SimpleName → unit, `None` outside the project.
    explicit: FxHashMap<SmolStr, Option<UnitId>>,
    /// Types declared in the same package, including the unit itself.
    package: FxHashMap<SmolStr, UnitId>,
    /// Types reachable through wildcard imports. SimpleName → candidates.
    wildcard: FxHashMap<SmolStr, Vec<UnitId>>,
}

impl ScopeVisibility {
    pub fn new(scope: impl Into<SmolStr>) -> Self {
        Self {
            scope: scope.into(),
            ..Self::default()
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    fn add_explicit(&mut self, simple_name: SmolStr, target: Option<UnitId>) {
        self.explicit.entry(simple_name).or_insert(target);
    }

    fn add_package(&mut self, simple_name: SmolStr, target: UnitId) {
        self.package.insert(simple_name, target);
    }

    fn add_wildcard(&mut self, simple_name: SmolStr, target: UnitId) {
        let candidates = self.wildcard.entry(simple_name).or_default();
        if !candidates.contains(&target) {
            candidates.push(target);
        }
    }

    /// Look a simple name up through imports, package and wildcards in turn.
    ///
    /// Returns `None` when this scope has no opinion, so the caller can fall
    /// back to project-wide lookup.
    fn lookup(&self, simple_name: &str) -> Option<ResolveResult> {
        if let Some(target) = self.explicit.get(simple_name) {
            return Some(match target {
                Some(id) => ResolveResult::Found(*id),
                None => ResolveResult::NotFound,
            });
        }
        if let Some(id) = self.package.get(simple_name) {
            return Some(ResolveResult::Found(*id));
        }
        match self.wildcard.get(simple_name).map(Vec::as_slice) {
            Some([id]) => Some(ResolveResult::Found(*id)),
            Some(ids) if ids.len() > 1 => Some(ResolveResult::Ambiguous(ids.to_vec())),
            _ => None,
        }
    }
}

// ============================================================================
// UNIT INDEX
// ============================================================================

/// All units of a run, by name.
#[derive(Debug)]
pub struct UnitIndex<'a> {
    units: &'a [SourceUnit],
    by_qualified_name: IndexMap<SmolStr, UnitId>,
    by_simple_name: FxHashMap<SmolStr, Vec<UnitId>>,
    visibility: Vec<ScopeVisibility>,
}

impl<'a> UnitIndex<'a> {
    /// Index units that are already sorted and free of duplicates.
    pub fn new(units: &'a [SourceUnit]) -> Self {
        let mut by_qualified_name = IndexMap::with_capacity(units.len());
        let mut by_simple_name: FxHashMap<SmolStr, Vec<UnitId>> = FxHashMap::default();
        for (i, unit) in units.iter().enumerate() {
            let id = UnitId(i as u32);
            by_qualified_name.insert(unit.name.clone(), id);
            by_simple_name
                .entry(unit.simple_name.clone())
                .or_default()
                .push(id);
        }

        let mut index = Self {
            units,
            by_qualified_name,
            by_simple_name,
            visibility: Vec::with_capacity(units.len()),
        };
        index.visibility = units.iter().map(|unit| index.build_visibility(unit)).collect();
        index
    }

    fn build_visibility(&self, unit: &SourceUnit) -> ScopeVisibility {
        let mut vis = ScopeVisibility::new(unit.name.clone());

        for import in &unit.imports {
            match (import.wildcard, import.is_static) {
                // import a.b.Type;
                (false, false) => {
                    let target = self.by_qualified_name.get(&import.path).copied();
                    vis.add_explicit(SmolStr::new(import.simple_name()), target);
                }
                // import static a.b.Type.member;
                (false, true) => {
                    if let Some((owner, _)) = import.path.rsplit_once('.') {
                        if let Some(id) = self.by_qualified_name.get(owner) {
                            vis.add_explicit(self.units[id.index()].simple_name.clone(), Some(*id));
                        }
                    }
                }
                // import a.b.*;
                (true, false) => {
                    for (id, other) in self.iter() {
                        if other.package.as_deref() == Some(import.path.as_str()) {
                            vis.add_wildcard(other.simple_name.clone(), id);
                        }
                    }
                }
                // import static a.b.Type.*;
                (true, true) => {
                    if let Some(id) = self.by_qualified_name.get(&import.path) {
                        vis.add_wildcard(self.units[id.index()].simple_name.clone(), *id);
                    }
                }
            }
        }

        for (id, other) in self.iter() {
            if other.package == unit.package {
                vis.add_package(other.simple_name.clone(), id);
            }
        }
        vis
    }

    fn iter(&self) -> impl Iterator<Item = (UnitId, &'a SourceUnit)> + 'a {
        self.units
            .iter()
            .enumerate()
            .map(|(i, unit)| (UnitId(i as u32), unit))
    }

    pub fn get(&self, id: UnitId) -> &'a SourceUnit {
        &self.units[id.index()]
    }

    pub fn lookup_qualified(&self, name: &str) -> Option<UnitId> {
        self.by_qualified_name.get(name).copied()
    }

    pub fn lookup_simple(&self, name: &str) -> &[UnitId] {
        self.by_simple_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn visibility(&self, id: UnitId) -> &ScopeVisibility {
        &self.visibility[id.index()]
    }
}

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// Result of resolving a type or member reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ResolveResult<T = UnitId> {
    /// Exactly one candidate.
    Found(T),
    /// Several candidates.
    Ambiguous(Vec<T>),
    NotFound,
}

// ============================================================================
// RESOLVER
// ============================================================================

/// Resolves type names and members as seen from one unit.
pub struct Resolver<'i, 'a> {
    index: &'i UnitIndex<'a>,
    current: UnitId,
}

impl<'i, 'a> Resolver<'i, 'a> {
    pub fn new(index: &'i UnitIndex<'a>, current: UnitId) -> Self {
        Self { index, current }
    }

    /// Resolve a type name written in the current unit.
    pub fn resolve_type(&self, name: &str) -> ResolveResult {
        if name.contains('.') {
            return match self.index.lookup_qualified(name) {
                Some(id) => ResolveResult::Found(id),
                None => ResolveResult::NotFound,
            };
        }
        if let Some(result) = self.index.visibility(self.current).lookup(name) {
            return result;
        }
        match self.index.lookup_simple(name) {
            [] => ResolveResult::NotFound,
            [id] => ResolveResult::Found(*id),
            ids => ResolveResult::Ambiguous(ids.to_vec()),
        }
    }

    /// Resolve `name/arity` on `owner`, walking up the superclass chain.
    pub fn resolve_method(
        &self,
        owner: UnitId,
        name: &str,
        arity: usize,
    ) -> ResolveResult<(UnitId, usize)> {
        let mut seen = FxHashSet::default();
        let mut current = owner;
        while seen.insert(current) {
            let unit = self.index.get(current);
            let matches: Vec<(UnitId, usize)> = method_indices(unit, name, arity)
                .map(|index| (current, index))
                .collect();
            match matches.len() {
                0 => {}
                1 => return ResolveResult::Found(matches[0]),
                _ => return ResolveResult::Ambiguous(matches),
            }
            let Some(superclass) = &unit.superclass else {
                break;
            };
            match Resolver::new(self.index, current).resolve_type(superclass) {
                ResolveResult::Found(parent) => current = parent,
                _ => break,
            }
        }
        ResolveResult::NotFound
    }

    /// Resolve a constructor of `owner` taking `arity` arguments.
    pub fn resolve_constructor(&self, owner: UnitId, arity: usize) -> ResolveResult<ResolvedTarget> {
        let unit = self.index.get(owner);
        let declared: Vec<(usize, &MethodDef)> = unit
            .members
            .iter()
            .enumerate()
            .filter_map(|(i, _)| unit.method_at(i).map(|m| (i, m)))
            .filter(|(_, m)| m.role == MethodRole::Constructor)
            .collect();
        if declared.is_empty() {
            return if arity == 0 {
                ResolveResult::Found(ResolvedTarget::Constructor(None))
            } else {
                ResolveResult::NotFound
            };
        }
        let matches: Vec<ResolvedTarget> = declared
            .iter()
            .filter(|(_, m)| m.arity() == arity)
            .map(|(i, _)| ResolvedTarget::Constructor(Some(*i)))
            .collect();
        match matches.as_slice() {
            [] => ResolveResult::NotFound,
            [found] => ResolveResult::Found(*found),
            _ => ResolveResult::Ambiguous(matches),
        }
    }
}

fn method_indices<'u>(
    unit: &'u SourceUnit,
    name: &'u str,
    arity: usize,
) -> impl Iterator<Item = usize> + 'u {
    (0..unit.members.len()).filter(move |&i| {
        unit.method_at(i).is_some_and(|m| {
            m.role != MethodRole::Constructor && m.name == name && m.arity() == arity
        })
    })
}

// ============================================================================
// LINK
// ============================================================================

/// Link extracted units into an [`ActionModel`].
///
/// The result does not depend on the order of `units`.
pub fn link(mut units: Vec<SourceUnit>) -> Result<ActionModel> {
    units.sort_by(|a, b| a.name.cmp(&b.name));
    check_duplicates(&units)?;

    let index = UnitIndex::new(&units);
    let mut resolved = FxHashMap::default();
    let mut dependencies = vec![Vec::new(); units.len()];
    let mut graph = CallGraph::default();

    for (id, unit) in index.iter() {
        let resolver = Resolver::new(&index, id);
        for site in unit.call_sites() {
            let resolution = resolve_site(&resolver, &index, id, unit, &site)?;
            trace!(
                unit = %unit.name,
                owner = %site.owner,
                site = site.site.0,
                target = %index.get(resolution.unit).name,
                "resolved call site"
            );
            if resolution.unit != id {
                dependencies[id.index()].push(resolution.unit);
            }
            if let ResolvedTarget::Method(callee) | ResolvedTarget::Constructor(Some(callee)) =
                resolution.target
            {
                graph.add_edge((id, site.member), (resolution.unit, callee), &site);
            }
            resolved.insert(CallSite { unit: id, site: site.site }, resolution);
        }
    }

    graph.check_cycles(&index)?;

    for deps in &mut dependencies {
        deps.sort();
        deps.dedup();
    }
    debug!(
        units = units.len(),
        sites = resolved.len(),
        "linked action model"
    );

    let by_name = units
        .iter()
        .enumerate()
        .map(|(i, unit)| (unit.name.clone(), UnitId(i as u32)))
        .collect();
    Ok(ActionModel {
        units,
        by_name,
        resolved,
        dependencies,
    })
}

fn check_duplicates(units: &[SourceUnit]) -> Result<()> {
    for pair in units.windows(2) {
        if pair[0].name == pair[1].name {
            return Err(LinkError::Ambiguous {
                unit: pair[1].unit_name.clone(),
                span: None,
                name: pair[1].name.clone(),
                candidates: vec![pair[0].name.clone(), pair[1].name.clone()],
            });
        }
    }
    Ok(())
}

fn resolve_site(
    resolver: &Resolver<'_, '_>,
    index: &UnitIndex<'_>,
    id: UnitId,
    unit: &SourceUnit,
    site: &CallSiteRef<'_>,
) -> Result<Resolution> {
    let span = Some(site.provenance.span);
    let unresolved = |name: String| LinkError::Unresolved {
        unit: unit.unit_name.clone(),
        span,
        name: name.into(),
    };
    let ambiguous = |name: String, candidates: Vec<SmolStr>| LinkError::Ambiguous {
        unit: unit.unit_name.clone(),
        span,
        name: name.into(),
        candidates,
    };

    let type_name = match site.kind {
        CallSiteKind::Delegate(call) => &call.type_name,
        CallSiteKind::Instantiate { type_name, .. } => type_name,
    };
    let owner = if *type_name == unit.simple_name || *type_name == unit.name {
        id
    } else {
        match resolver.resolve_type(type_name) {
            ResolveResult::Found(owner) => owner,
            ResolveResult::Ambiguous(ids) => {
                let candidates = ids.iter().map(|i| index.get(*i).name.clone()).collect();
                return Err(ambiguous(type_name.to_string(), candidates));
            }
            ResolveResult::NotFound => return Err(unresolved(type_name.to_string())),
        }
    };
    let owner_name = &index.get(owner).simple_name;

    match site.kind {
        CallSiteKind::Delegate(call) => {
            let arity = call.args.len();
            let display = format!("{owner_name}.{}/{arity}", call.method);
            match resolver.resolve_method(owner, &call.method, arity) {
                ResolveResult::Found((unit, member)) => Ok(Resolution {
                    unit,
                    target: ResolvedTarget::Method(member),
                }),
                ResolveResult::Ambiguous(found) => {
                    let candidates = found
                        .iter()
                        .map(|(u, _)| SmolStr::new(format!("{}.{}", index.get(*u).name, call.method)))
                        .collect();
                    Err(ambiguous(display, candidates))
                }
                ResolveResult::NotFound => Err(unresolved(display)),
            }
        }
        CallSiteKind::Instantiate { arity, .. } => {
            let display = format!("new {owner_name}/{arity}");
            match resolver.resolve_constructor(owner, arity) {
                ResolveResult::Found(target) => Ok(Resolution {
                    unit: owner,
                    target,
                }),
                ResolveResult::Ambiguous(found) => {
                    let candidates = found
                        .iter()
                        .map(|_| index.get(owner).name.clone())
                        .collect();
                    Err(ambiguous(display, candidates))
                }
                ResolveResult::NotFound => Err(unresolved(display)),
            }
        }
    }
}

// ============================================================================
// CYCLE DETECTION
// ============================================================================

/// (unit, member index)
type MemberKey = (UnitId, usize);

/// Member-level delegate graph.
#[derive(Default)]
struct CallGraph {
    graph: DiGraph<MemberKey, ()>,
    nodes: IndexMap<MemberKey, NodeIndex>,
    /// First call site of each edge, for reporting
    edge_spans: FxHashMap<(MemberKey, MemberKey), Span>,
}

impl CallGraph {
    fn node(&mut self, key: MemberKey) -> NodeIndex {
        if let Some(&node) = self.nodes.get(&key) {
            return node;
        }
        let node = self.graph.add_node(key);
        self.nodes.insert(key, node);
        node
    }

    fn add_edge(&mut self, from: MemberKey, to: MemberKey, site: &CallSiteRef<'_>) {
        let a = self.node(from);
        let b = self.node(to);
        if !self.graph.contains_edge(a, b) {
            self.graph.add_edge(a, b, ());
            self.edge_spans.insert((from, to), site.provenance.span);
        }
    }

    fn check_cycles(&self, index: &UnitIndex<'_>) -> Result<()> {
        let mut cycles: Vec<Vec<MemberKey>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| {
                scc.len() > 1 || scc.first().is_some_and(|&n| self.graph.contains_edge(n, n))
            })
            .map(|scc| self.cycle_path(&scc))
            .collect();
        cycles.sort();

        let Some(cycle) = cycles.into_iter().next() else {
            return Ok(());
        };
        let start = cycle[0];
        let next = cycle.get(1).copied().unwrap_or(start);
        let mut path = String::new();
        for (i, key) in cycle.iter().chain(std::iter::once(&start)).enumerate() {
            if i > 0 {
                path.push_str(" -> ");
            }
            let unit = index.get(key.0);
            let member = unit.member_name(key.1).map(SmolStr::as_str).unwrap_or("?");
            let _ = write!(path, "{}.{member}", unit.simple_name);
        }
        Err(LinkError::Cycle {
            unit: index.get(start.0).unit_name.clone(),
            span: self.edge_spans.get(&(start, next)).copied(),
            path,
        })
    }

    /// Shortest cycle through the smallest member of a strongly connected component
    fn cycle_path(&self, scc: &[NodeIndex]) -> Vec<MemberKey> {
        let members: FxHashSet<NodeIndex> = scc.iter().copied().collect();
        let Some(&start) = scc.iter().min_by_key(|&&n| self.graph[n]) else {
            return Vec::new();
        };

        // BFS from start back to start, staying inside the component
        let mut previous: FxHashMap<NodeIndex, NodeIndex> = FxHashMap::default();
        let mut queue = std::collections::VecDeque::from([start]);
        let mut last = None;
        'search: while let Some(node) = queue.pop_front() {
            let mut successors: Vec<NodeIndex> = self
                .graph
                .neighbors(node)
                .filter(|n| members.contains(n))
                .collect();
            successors.sort_by_key(|&n| self.graph[n]);
            for next in successors {
                if next == start {
                    last = Some(node);
                    break 'search;
                }
                if let std::collections::hash_map::Entry::Vacant(entry) = previous.entry(next) {
                    entry.insert(node);
                    queue.push_back(next);
                }
            }
        }

        let mut path = Vec::new();
        let mut cursor = last;
        while let Some(node) = cursor {
            path.push(self.graph[node]);
            cursor = if node == start {
                None
            } else {
                previous.get(&node).copied()
            };
        }
        path.reverse();
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hir::diagnostics::DiagnosticCollector;
    use crate::hir::extract::extract;
    use crate::syntax::parse;

    fn unit(name: &str, text: &str) -> SourceUnit {
        let file = parse(text, name).expect("parse");
        extract(&file, &mut DiagnosticCollector::new())
    }

    const LOGIN_PAGE: &str = r#"
package com.example.pages;
public class LoginPage {
    private WebDriver driver;
    @FindBy(id = "user") private WebElement user;
    public LoginPage(WebDriver driver) { this.driver = driver; }
    public void login(String name) { user.sendKeys(name); }
    public void login() { login("admin"); }
}
"#;

    const LOGIN_TEST: &str = r#"
package com.example.tests;
import com.example.pages.LoginPage;
public class LoginTest {
    WebDriver driver;
    @Test public void logs_in() {
        LoginPage page = new LoginPage(driver);
        page.login();
    }
}
"#;

    #[test]
    fn test_link_is_order_independent() {
        let a = link(vec![
            unit("LoginTest.java", LOGIN_TEST),
            unit("LoginPage.java", LOGIN_PAGE),
        ])
        .expect("link");
        let b = link(vec![
            unit("LoginPage.java", LOGIN_PAGE),
            unit("LoginTest.java", LOGIN_TEST),
        ])
        .expect("link");
        let names = |m: &ActionModel| m.units().iter().map(|u| u.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&a), names(&b));
        assert_eq!(names(&a)[0], "com.example.pages.LoginPage");
        assert_eq!(a.resolved_count(), b.resolved_count());
    }

    #[test]
    fn test_overloads_resolve_by_arity() {
        let model = link(vec![
            unit("LoginTest.java", LOGIN_TEST),
            unit("LoginPage.java", LOGIN_PAGE),
        ])
        .expect("link");
        let test = model.unit_id("com.example.tests.LoginTest").expect("test unit");
        let page = model.unit_id("com.example.pages.LoginPage").expect("page unit");
        assert_eq!(model.dependencies(test), &[page]);
        assert!(model.dependencies(page).is_empty());

        let unit = model.unit(test).expect("unit");
        let sites = unit.call_sites();
        assert_eq!(sites.len(), 2);
        let ctor = model.resolution(test, sites[0].site).expect("constructor");
        assert!(matches!(ctor.target, ResolvedTarget::Constructor(Some(_))));
        let call = model.resolution(test, sites[1].site).expect("login");
        let method = model.method(call).expect("method");
        assert_eq!((method.name.as_str(), method.arity()), ("login", 0));
    }

    #[test]
    fn test_unresolved_import() {
        let err = link(vec![unit("LoginTest.java", LOGIN_TEST)]).unwrap_err();
        assert!(matches!(&err, LinkError::Unresolved { name, .. } if name == "LoginPage"));
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("E0001"));
    }

    #[test]
    fn test_unresolved_method() {
        let caller = r#"
package com.example.tests;
import com.example.pages.LoginPage;
public class LogoutTest {
    WebDriver driver;
    @Test public void t() { LoginPage page = new LoginPage(driver); page.logout(); }
}
"#;
        let err = link(vec![
            unit("LogoutTest.java", caller),
            unit("LoginPage.java", LOGIN_PAGE),
        ])
        .unwrap_err();
        assert!(matches!(&err, LinkError::Unresolved { name, .. } if name == "LoginPage.logout/0"));
    }

    #[test]
    fn test_implicit_constructor() {
        let utils = "package a; public class Helpers { public static void pause() { } }";
        let caller = "package a; public class UsesHelpers { @Test public void t() { Helpers h = new Helpers(); Helpers.pause(); } }";
        let model = link(vec![unit("Helpers.java", utils), unit("UsesHelpers.java", caller)])
            .expect("link");
        let id = model.unit_id("a.UsesHelpers").expect("unit");
        let sites = model.unit(id).expect("unit").call_sites();
        let ctor = model.resolution(id, sites[0].site).expect("ctor");
        assert_eq!(ctor.target, ResolvedTarget::Constructor(None));
        assert!(model.method(ctor).is_none());
    }

    #[test]
    fn test_duplicate_units() {
        let text = "package a; public class Same { }";
        let err = link(vec![unit("one/Same.java", text), unit("two/Same.java", text)]).unwrap_err();
        assert!(matches!(err, LinkError::Ambiguous { .. }));
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("E0004"));
    }

    #[test]
    fn test_ambiguous_simple_name() {
        let one = "package a; public class Pages { public void open() { } }";
        let two = "package b; public class Pages { public void open() { } }";
        let caller = "package c; public class T { @Test public void t() { Pages p = new Pages(); p.open(); } }";
        let err = link(vec![
            unit("a/Pages.java", one),
            unit("b/Pages.java", two),
            unit("c/T.java", caller),
        ])
        .unwrap_err();
        let LinkError::Ambiguous { candidates, .. } = &err else {
            panic!("expected ambiguity, got {err}");
        };
        assert_eq!(candidates, &["a.Pages", "b.Pages"]);
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("E0002"));
    }

    #[test]
    fn test_same_package_beats_simple_name() {
        let one = "package a; public class Pages { public void open() { } }";
        let two = "package b; public class Pages { public void open() { } }";
        let caller = "package b; public class T { @Test public void t() { Pages p = new Pages(); p.open(); } }";
        let model = link(vec![
            unit("a/Pages.java", one),
            unit("b/Pages.java", two),
            unit("b/T.java", caller),
        ])
        .expect("link");
        let id = model.unit_id("b.T").expect("unit");
        assert_eq!(model.dependencies(id), &[model.unit_id("b.Pages").expect("b.Pages")]);
    }

    #[test]
    fn test_cycle_across_units() {
        let a = "package p; public class A { public static void m() { B.n(); } }";
        let b = "package p; public class B { public static void n() { A.m(); } }";
        let err = link(vec![unit("A.java", a), unit("B.java", b)]).unwrap_err();
        let LinkError::Cycle { path, .. } = &err else {
            panic!("expected cycle, got {err}");
        };
        assert_eq!(path, "A.m -> B.n -> A.m");
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("E0007"));
    }

    #[test]
    fn test_self_recursion_is_a_cycle() {
        let a = "package p; public class Loop { public void spin() { spin(); } }";
        let err = link(vec![unit("Loop.java", a)]).unwrap_err();
        assert!(matches!(&err, LinkError::Cycle { path, .. } if path == "Loop.spin -> Loop.spin"));
    }

    #[test]
    fn test_inherited_method() {
        let base = "package p; public class BasePage { public void open() { } }";
        let page = "package p; public class HomePage extends BasePage { public void go() { open(); } }";
        let model = link(vec![unit("BasePage.java", base), unit("HomePage.java", page)])
            .expect("link");
        let home = model.unit_id("p.HomePage").expect("home");
        assert_eq!(model.dependencies(home), &[model.unit_id("p.BasePage").expect("base")]);
    }
}
