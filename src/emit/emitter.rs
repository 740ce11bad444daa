//! Per-unit emission: file structure, declarations and imports.
//!
//! Method bodies are rendered by `body.rs` and expressions by `expr.rs`; both
//! extend [`UnitEmitter`] with further `impl` blocks.

use std::collections::BTreeSet;

use rustc_hash::{FxHashMap, FxHashSet};
use smol_str::SmolStr;

use super::paths::OutputPath;
use super::profile::{LocatorPlacement, TargetProfile, Templates};
use super::template::{Vars, indent, render};
use super::{ConversionKind, ConversionUnit, EmitError};
use crate::base::Span;
use crate::hir::{
    ActionKind, ActionModel, Binding, Diagnostic, ElementRef, Expr, FieldDef, FieldKind, Member,
    MethodBody, MethodDef, MethodRole, ParamDef, Provenance, SourceUnit, Strategy, Condition,
    UnitId, UnitKind, is_driver_type,
};

pub(super) type Result<T> = std::result::Result<T, EmitError>;

// ============================================================================
// SCOPES
// ============================================================================

/// How the unit that owns a body refers to its own members
#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum SelfRef {
    /// Page-object class body: `this.x`
    Instance,
    /// Test file or utility module: bare names
    Module,
    /// Page-object method inlined at a call site: `receiver.x`
    Receiver(String),
    /// Utility function inlined at a call site: `Module.x`
    Namespace(SmolStr),
}

/// Calling convention of a rendered function or method
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum Convention {
    /// Instance method of a class; the harness lives on the instance
    Method,
    /// Free or static function; the harness is the first parameter
    Function,
    Constructor,
}

/// Rendering state of one method body
pub(super) struct Scope<'b> {
    pub(super) owner: UnitId,
    pub(super) body: &'b MethodBody,
    /// Expression naming the browser handle
    pub(super) harness: String,
    pub(super) self_ref: SelfRef,
    /// Inside a body copied to its call site
    pub(super) inlined: bool,
    /// Inline text of anonymous element handles
    pub(super) elements: FxHashMap<ElementRef, String>,
    pub(super) declared: FxHashSet<SmolStr>,
    /// Names bound more than once in the body; declared with `let`
    pub(super) rebound: FxHashSet<SmolStr>,
    pub(super) renames: FxHashMap<SmolStr, String>,
}

impl<'b> Scope<'b> {
    pub(super) fn new(owner: UnitId, body: &'b MethodBody, harness: String, self_ref: SelfRef) -> Self {
        Self {
            owner,
            body,
            harness,
            self_ref,
            inlined: false,
            elements: FxHashMap::default(),
            declared: FxHashSet::default(),
            rebound: rebound_names(body),
            renames: FxHashMap::default(),
        }
    }

    /// Keyword for binding `name`, or `None` if it is already declared
    pub(super) fn declare(&mut self, name: &SmolStr, mutable: bool) -> Option<&'static str> {
        if !self.declared.insert(name.clone()) {
            return None;
        }
        Some(if mutable || self.rebound.contains(name) { "let" } else { "const" })
    }
}

fn rebound_names(body: &MethodBody) -> FxHashSet<SmolStr> {
    let mut counts: FxHashMap<SmolStr, usize> = FxHashMap::default();
    for action in body.walk() {
        let name = match &action.kind {
            ActionKind::Locate { element, .. } | ActionKind::Nth { element, .. } => {
                body.element(*element).and_then(|b| b.name.clone())
            }
            ActionKind::Instantiate {
                binding: Binding::Local { name, .. },
                ..
            } => Some(name.clone()),
            ActionKind::Bind { name, .. } => Some(name.clone()),
            ActionKind::Assign {
                target: Expr::Var(name),
                ..
            } => Some(name.clone()),
            _ => None,
        };
        if let Some(name) = name {
            *counts.entry(name).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name)
        .collect()
}

// ============================================================================
// UNIT EMITTER
// ============================================================================

pub(super) struct UnitEmitter<'m> {
    pub(super) model: &'m ActionModel,
    pub(super) profile: &'m TargetProfile,
    pub(super) id: UnitId,
    pub(super) unit: &'m SourceUnit,
    path: OutputPath,
    /// Units whose names appear in the output and need an import
    referenced: BTreeSet<UnitId>,
    diagnostics: Vec<Diagnostic>,
    /// Span of the action being rendered, for errors
    span: Option<Span>,
}

impl<'m> UnitEmitter<'m> {
    pub(super) fn new(
        model: &'m ActionModel,
        profile: &'m TargetProfile,
        id: UnitId,
        unit: &'m SourceUnit,
    ) -> Self {
        Self {
            model,
            profile,
            id,
            unit,
            path: OutputPath::for_unit(unit, profile),
            referenced: BTreeSet::new(),
            diagnostics: Vec::new(),
            span: None,
        }
    }

    pub(super) fn emit(mut self) -> (Result<ConversionUnit>, Vec<Diagnostic>) {
        let text = match self.unit.kind {
            UnitKind::TestClass | UnitKind::Suite => self.test_file(),
            UnitKind::PageObject => self.page_object(),
            UnitKind::UtilityModule => self.utility_module(),
        };
        let result = text.map(|text| ConversionUnit {
            name: self.unit.name.clone(),
            path: self.path.to_path_buf(),
            kind: ConversionKind::from(self.unit.kind),
            text,
        });
        (result, self.diagnostics)
    }

    // ------------------------------------------------------------------------
    // Errors and notes
    // ------------------------------------------------------------------------

    /// Record the action being rendered
    pub(super) fn at(&mut self, provenance: &Provenance) {
        self.span = (provenance.unit == self.unit.unit_name).then_some(provenance.span);
    }

    pub(super) fn note(&mut self, provenance: &Provenance, code: &'static str, message: String) {
        let mut diagnostic = Diagnostic::info(self.unit.unit_name.clone(), message).with_code(code);
        if provenance.unit == self.unit.unit_name {
            diagnostic = diagnostic.with_span(provenance.span);
        }
        self.diagnostics.push(diagnostic);
    }

    pub(super) fn unsupported_locator(&self, strategy: Strategy) -> EmitError {
        EmitError::UnsupportedLocator {
            unit: self.unit.unit_name.clone(),
            span: self.span,
            profile: self.profile.name.clone(),
            strategy,
        }
    }

    pub(super) fn unsupported_condition(&self, condition: Condition) -> EmitError {
        EmitError::UnsupportedCondition {
            unit: self.unit.unit_name.clone(),
            span: self.span,
            profile: self.profile.name.clone(),
            condition,
        }
    }

    /// Template `key` of a profile section
    pub(super) fn lookup(&self, section: &'static str, templates: &'m Templates, key: &str) -> Result<&'m str> {
        templates
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| EmitError::MissingTemplate {
                unit: self.unit.unit_name.clone(),
                span: self.span,
                profile: self.profile.name.clone(),
                section,
                key: key.to_string(),
            })
    }

    // ------------------------------------------------------------------------
    // Names and types
    // ------------------------------------------------------------------------

    /// Name of another unit, importing it
    pub(super) fn type_ref(&mut self, target: UnitId) -> String {
        let model = self.model;
        if target != self.id {
            self.referenced.insert(target);
        }
        model
            .unit(target)
            .map(|u| u.simple_name.to_string())
            .unwrap_or_default()
    }

    /// Project unit named `simple_name`, preferring units this one calls into
    fn project_unit(&self, simple_name: &str) -> Option<UnitId> {
        let model = self.model;
        let named = |id: &UnitId| model.unit(*id).is_some_and(|u| u.simple_name == simple_name);
        if let Some(id) = model.dependencies(self.id).iter().find(|id| named(id)) {
            return Some(*id);
        }
        let mut matches = model.iter().map(|(id, _)| id).filter(named);
        let first = matches.next()?;
        matches.next().is_none().then_some(first)
    }

    /// `: T` for typed profiles, empty otherwise
    pub(super) fn annotation(&mut self, java_type: &str) -> String {
        if !self.profile.typed {
            return String::new();
        }
        format!(": {}", self.type_name(java_type))
    }

    fn type_name(&mut self, java_type: &str) -> String {
        let profile = self.profile;
        if let Some(mapped) = profile.map_type(java_type) {
            return mapped.to_string();
        }
        match self.project_unit(java_type) {
            Some(id) => self.type_ref(id),
            None => "any".to_string(),
        }
    }

    pub(super) fn params(&mut self, params: &[ParamDef], convention: Convention) -> String {
        let profile = self.profile;
        let mut out = Vec::new();
        if convention != Convention::Method && profile.harness.passed {
            let annotation = self.annotation("WebDriver");
            out.push(format!("{}{annotation}", profile.harness.name));
        }
        for param in params.iter().filter(|p| !is_driver_type(&p.type_name)) {
            let annotation = self.annotation(&param.type_name);
            out.push(format!("{}{annotation}", param.name));
        }
        out.join(", ")
    }

    pub(super) fn indented(&self, text: &str) -> String {
        indent(text, 1, &self.profile.indent)
    }

    fn body_text(&mut self, body: &MethodBody, self_ref: SelfRef) -> Result<String> {
        let harness = match self_ref {
            SelfRef::Instance if self.profile.harness.passed => format!("this.{}", self.profile.harness.name),
            _ => self.profile.harness.name.clone(),
        };
        let mut scope = Scope::new(self.id, body, harness, self_ref);
        let lines = self.actions(&mut scope, &body.actions)?;
        Ok(self.indented(&lines.join("\n")))
    }

    /// Initializer of a field, rendered outside any method
    fn field_init(&mut self, field: &FieldDef, self_ref: SelfRef) -> Result<Option<String>> {
        let Some(init) = &field.init else {
            return Ok(None);
        };
        let empty = MethodBody::default();
        let scope = Scope::new(self.id, &empty, self.profile.harness.name.clone(), self_ref);
        self.expr(&scope, init).map(Some)
    }

    /// Fields that survive as state of the converted unit
    fn state_fields(&self) -> Vec<&'m FieldDef> {
        let unit = self.unit;
        unit.fields()
            .filter(|f| !f.kind.is_context() && !f.kind.is_locator_backed())
            .collect()
    }

    fn field_type(&mut self, field: &FieldDef) -> String {
        match &field.kind {
            FieldKind::Project(type_name) => self.annotation(type_name),
            _ => self.annotation(&field.type_name),
        }
    }

    // ------------------------------------------------------------------------
    // Test files
    // ------------------------------------------------------------------------

    fn test_file(&mut self) -> Result<String> {
        let profile = self.profile;
        let structure = &profile.structure;
        let unit = self.unit;
        let mut parts = Vec::new();

        let mut declarations = Vec::new();
        for field in self.state_fields() {
            let ty = self.field_type(field);
            let init = self.field_init(field, SelfRef::Module)?;
            let vars = Vars::new()
                .with("name", field.name.as_str())
                .with("type", ty)
                .with("init", init.map(|i| format!(" = {i}")).unwrap_or_default());
            declarations.push(render(&structure.describe_field, &vars));
        }
        if !declarations.is_empty() {
            parts.push(declarations.join("\n"));
        }

        for member in &unit.members {
            match member {
                Member::Field(_) => {}
                Member::Test(test) => {
                    self.at(&test.provenance);
                    let body = self.body_text(&test.body, SelfRef::Module)?;
                    let template = if test.skipped {
                        &structure.skipped_test
                    } else {
                        &structure.test
                    };
                    let vars = Vars::new().with("name", test.name.as_str()).with("body", body);
                    parts.push(render(template, &vars));
                }
                Member::Method(method) => {
                    self.at(&method.provenance);
                    let hook = match method.role {
                        MethodRole::Setup => &structure.before_each,
                        MethodRole::Teardown => &structure.after_each,
                        MethodRole::SetupAll => &structure.before_all,
                        MethodRole::TeardownAll => &structure.after_all,
                        MethodRole::Helper => {
                            parts.push(self.function(method, &structure.helper)?);
                            continue;
                        }
                        MethodRole::Constructor => continue,
                    };
                    let body = self.body_text(&method.body, SelfRef::Module)?;
                    // a hook that only opened or closed the browser has nothing left
                    if body.trim().is_empty() {
                        continue;
                    }
                    parts.push(render(hook, &Vars::new().with("body", body)));
                }
            }
        }

        let describe = render(
            &structure.describe,
            &Vars::new()
                .with("name", unit.simple_name.as_str())
                .with("body", self.indented(&parts.join("\n\n"))),
        );
        Ok(self.file(&structure.test_header, describe))
    }

    /// A helper or utility function: harness first, driver parameters dropped
    fn function(&mut self, method: &MethodDef, template: &str) -> Result<String> {
        self.at(&method.provenance);
        let params = self.params(&method.params, Convention::Function);
        let body = self.body_text(&method.body, SelfRef::Module)?;
        let vars = Vars::new()
            .with("name", method.name.as_str())
            .with("params", params)
            .with("body", body);
        Ok(render(template, &vars))
    }

    // ------------------------------------------------------------------------
    // Page objects
    // ------------------------------------------------------------------------

    fn page_object(&mut self) -> Result<String> {
        let profile = self.profile;
        let structure = &profile.structure;
        let harness = &profile.harness;
        let unit = self.unit;
        let this_harness = if harness.passed {
            format!("this.{}", harness.name)
        } else {
            harness.name.clone()
        };

        let element_fields: Vec<&FieldDef> = unit
            .fields()
            .filter(|f| matches!(f.kind, FieldKind::Element | FieldKind::ElementList))
            .filter(|f| unit.locators.contains_key(&f.name))
            .collect();
        let state = self.state_fields();

        let mut parts = Vec::new();

        if !structure.field_declaration.is_empty() {
            let mut declarations = Vec::new();
            let mut declare = |name: &str, ty: String| {
                declarations.push(render(
                    &structure.field_declaration,
                    &Vars::new().with("name", name).with("type", ty),
                ));
            };
            if harness.passed {
                declare(&harness.name, self.annotation("WebDriver"));
            }
            for field in &element_fields {
                declare(&field.name, self.annotation("WebElement"));
            }
            for field in &state {
                declare(&field.name, self.field_type(field));
            }
            if !declarations.is_empty() {
                parts.push(declarations.join("\n"));
            }
        }

        let empty = MethodBody::default();
        let scope = Scope::new(self.id, &empty, this_harness.clone(), SelfRef::Instance);
        let mut locator_fields = Vec::new();
        for field in &element_fields {
            let Some(def) = unit.locators.get(&field.name) else { continue };
            let locator = self.locator(
                &scope,
                &this_harness,
                def.strategy,
                &Expr::Str(def.value.clone()),
                def.multiple,
            )?;
            locator_fields.push(render(
                &structure.locator_field,
                &Vars::new().with("name", field.name.as_str()).with("locator", locator),
            ));
        }

        // JavaScript allows a single constructor; the first declared one wins
        let constructor = unit.constructors().next();
        let extends = unit
            .superclass
            .as_ref()
            .and_then(|name| self.project_unit(name))
            .filter(|id| *id != self.id)
            .map(|id| self.type_ref(id));

        let mut init = Vec::new();
        if extends.is_some() {
            let arg = if harness.passed { harness.name.as_str() } else { "" };
            init.push(format!("super({arg});"));
        }
        let harness_init = render(&structure.harness_init, &Vars::new().with("harness", harness.name.as_str()));
        if !harness_init.is_empty() {
            init.push(harness_init);
        }
        match structure.locator_placement {
            LocatorPlacement::Constructor => init.append(&mut locator_fields),
            LocatorPlacement::Getter => {
                if !locator_fields.is_empty() {
                    parts.push(locator_fields.join("\n\n"));
                }
            }
        }
        for field in &state {
            if let Some(value) = self.field_init(field, SelfRef::Instance)? {
                init.push(format!("this.{} = {value};", field.name));
            }
        }
        let mut constructor_body = self.indented(&init.join("\n"));
        let params = match constructor {
            Some(method) => {
                self.at(&method.provenance);
                let body = self.body_text(&method.body, SelfRef::Instance)?;
                if !body.trim().is_empty() {
                    if !constructor_body.is_empty() {
                        constructor_body.push('\n');
                    }
                    constructor_body.push_str(&body);
                }
                self.params(&method.params, Convention::Constructor)
            }
            None => self.params(&[], Convention::Constructor),
        };
        if !(params.is_empty() && constructor_body.trim().is_empty()) {
            parts.push(render(
                &structure.constructor,
                &Vars::new().with("params", params).with("body", constructor_body),
            ));
        }

        for method in unit.methods().filter(|m| m.role != MethodRole::Constructor) {
            self.at(&method.provenance);
            let (template, convention, self_ref) = if method.is_static {
                (&structure.static_method, Convention::Function, SelfRef::Module)
            } else {
                (&structure.method, Convention::Method, SelfRef::Instance)
            };
            let params = self.params(&method.params, convention);
            let body = self.body_text(&method.body, self_ref)?;
            parts.push(render(
                template,
                &Vars::new()
                    .with("name", method.name.as_str())
                    .with("params", params)
                    .with("body", body),
            ));
        }

        let class = render(
            &structure.class,
            &Vars::new()
                .with("name", unit.simple_name.as_str())
                .with("extends", extends.map(|e| format!(" extends {e}")).unwrap_or_default())
                .with("body", self.indented(&parts.join("\n\n"))),
        );
        Ok(self.file(&structure.page_object_header, class))
    }

    // ------------------------------------------------------------------------
    // Utility modules
    // ------------------------------------------------------------------------

    fn utility_module(&mut self) -> Result<String> {
        let profile = self.profile;
        let structure = &profile.structure;
        let unit = self.unit;
        let mut parts = Vec::new();

        let mut declarations = Vec::new();
        for field in self.state_fields() {
            let ty = self.field_type(field);
            let init = self.field_init(field, SelfRef::Module)?;
            let binding = if field.is_final && init.is_some() { "const" } else { "let" };
            let vars = Vars::new()
                .with("binding", binding)
                .with("name", field.name.as_str())
                .with("type", ty)
                .with("init", init.map(|i| format!(" = {i}")).unwrap_or_default());
            declarations.push(render(&structure.module_field, &vars));
        }
        if !declarations.is_empty() {
            parts.push(declarations.join("\n"));
        }

        for method in unit.methods().filter(|m| m.role != MethodRole::Constructor) {
            parts.push(self.function(method, &structure.function)?);
        }
        Ok(self.file(&structure.utility_header, parts.join("\n\n")))
    }

    // ------------------------------------------------------------------------
    // Files
    // ------------------------------------------------------------------------

    /// Header, imports of every referenced unit, then the body
    fn file(&self, header: &str, body: String) -> String {
        let profile = self.profile;
        let model = self.model;
        let mut imports = Vec::new();
        for id in &self.referenced {
            let Some(target) = model.unit(*id) else { continue };
            let path = OutputPath::for_unit(target, profile)
                .import_from(&self.path, &profile.suffixes.import_extension);
            let template = match target.kind {
                UnitKind::PageObject => &profile.structure.import_class,
                _ => &profile.structure.import_module,
            };
            imports.push(render(
                template,
                &Vars::new().with("name", target.simple_name.as_str()).with("path", path),
            ));
        }

        let mut text = String::new();
        if !header.is_empty() {
            text.push_str(header);
            text.push('\n');
        }
        if !imports.is_empty() {
            text.push_str(&imports.join("\n"));
            text.push('\n');
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(&body);
        text.push('\n');
        text
    }
}
