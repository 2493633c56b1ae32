//! Binding emission.
//!
//! Walks the route tree once to plan every operation (names, keys, composed
//! inputs), checks that no two operations claim the same identifier, then
//! renders each target independently into route modules plus an `index`
//! barrel. Targets share the immutable plan and are rendered in parallel.

mod bindings;

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::compose::{ComposedOperation, OperationClass, compose};
use crate::descriptor::HttpMethod;
use crate::error::{GenerateError, Warning};
use crate::ir::{Emit, ImportItem, TsFunction, TsImport, TsModule};
use crate::status::StatusPredicate;
use crate::synth::{CacheKey, Names, Synthesis, synthesize};
use crate::targets::{LibraryImport, Target, TargetAdapter};
use crate::tree::{OperationDescriptor, RouteTree};

/// First line of every generated module.
pub const GENERATED_HEADER: &str = "Code generated by routebind. DO NOT EDIT.";

/// Global TypeScript types generated code refers to by name.
const GLOBAL_TYPES: [&str; 4] = ["Error", "Omit", "Promise", "Record"];

/// Where generated modules import their collaborators from, and which
/// statuses count as success.
#[derive(Debug, Clone)]
pub struct EmitOptions {
    /// Module exporting `client`, `invokeAndParse` and `ClientOptions`.
    pub runtime_module: String,
    /// Module exporting the named schema types.
    pub types_module: String,
    pub success: StatusPredicate,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            runtime_module: "../client".into(),
            types_module: "../types".into(),
            success: StatusPredicate::default(),
        }
    }
}

/// Kind of generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Invoker,
    KeyGetter,
    QueryOptions,
    Hook,
    MutationKey,
    MutationOptions,
}

/// One generated artifact for one operation and one target.
#[derive(Debug, Clone)]
pub struct Binding {
    pub kind: BindingKind,
    pub identifier: String,
    pub cache_key: CacheKey,
    /// Target name (`tanstack-react`).
    pub target: &'static str,
    pub method: HttpMethod,
    pub route_template: String,
    pub function: TsFunction,
}

/// One output file, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub target: &'static str,
    /// `<target>/<route-file>.ts`
    pub path: String,
    pub contents: String,
}

/// Result of a generation run.
#[derive(Debug, Clone, Default)]
pub struct Emission {
    pub bindings: Vec<Binding>,
    pub modules: Vec<GeneratedModule>,
    pub warnings: Vec<Warning>,
}

impl Emission {
    /// Module by relative path.
    pub fn module(&self, path: &str) -> Option<&GeneratedModule> {
        self.modules.iter().find(|m| m.path == path)
    }

    /// Binding by target and identifier.
    pub fn binding(&self, target: &str, identifier: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| b.target == target && b.identifier == identifier)
    }
}

/// Everything derived from one operation before rendering.
#[derive(Debug)]
pub(crate) struct OperationPlan<'a> {
    pub operation: &'a OperationDescriptor,
    pub synthesis: Synthesis,
    pub names: Names,
    pub composed: ComposedOperation,
}

impl OperationPlan<'_> {
    /// Every top-level identifier this operation may export.
    fn identifiers(&self) -> Vec<&str> {
        let names = &self.names;
        let mut identifiers = vec![names.invoker.as_str(), names.hook.as_str()];
        match self.composed.class {
            OperationClass::Read => {
                identifiers.extend([names.key_getter.as_str(), names.query_options.as_str()]);
            }
            OperationClass::Write => {
                identifiers.extend([names.mutation_key.as_str(), names.mutation_options.as_str()]);
            }
        }
        if self.composed.requires_args {
            identifiers.push(names.args_type.as_str());
        }
        identifiers.push(names.response_type.as_str());
        identifiers
    }
}

fn plan<'a>(tree: &'a RouteTree, success: &StatusPredicate) -> Vec<OperationPlan<'a>> {
    tree.operations()
        .into_iter()
        .map(|operation| {
            let composed = compose(operation, success);
            let synthesis = synthesize(operation.method, &operation.path, composed.requires_args);
            let names = synthesis.names();
            OperationPlan {
                operation,
                synthesis,
                names,
                composed,
            }
        })
        .collect()
}

fn check_collisions(plans: &[OperationPlan<'_>]) -> Result<(), GenerateError> {
    let mut seen: HashMap<&str, &OperationPlan<'_>> = HashMap::new();
    for plan in plans {
        for identifier in plan.identifiers() {
            match seen.entry(identifier) {
                Entry::Occupied(first) => {
                    let first = *first.get();
                    return Err(GenerateError::IdentifierCollision {
                        identifier: identifier.to_string(),
                        first_method: first.operation.method,
                        first_path: first.operation.source_path.clone(),
                        second_method: plan.operation.method,
                        second_path: plan.operation.source_path.clone(),
                    });
                }
                Entry::Vacant(slot) => {
                    slot.insert(plan);
                }
            }
        }
    }
    Ok(())
}

/// Emit bindings for every operation of `tree` and every target.
///
/// Repeated targets are rendered once. Output is deterministic: modules and
/// bindings follow target order, then depth-first operation order.
pub fn emit(
    tree: &RouteTree,
    targets: &[Target],
    options: &EmitOptions,
) -> Result<Emission, GenerateError> {
    let plans = plan(tree, &options.success);
    check_collisions(&plans)?;

    let warnings: Vec<Warning> = plans
        .iter()
        .filter_map(|plan| plan.composed.warning.clone())
        .collect();
    for warning in &warnings {
        warn!("{warning}");
    }

    let mut unique: Vec<Target> = Vec::with_capacity(targets.len());
    for target in targets {
        if !unique.contains(target) {
            unique.push(*target);
        }
    }

    let rendered: Vec<(Vec<Binding>, Vec<GeneratedModule>)> = unique
        .par_iter()
        .map(|target| render_target(target.adapter(), &plans, options))
        .collect();

    let mut emission = Emission {
        warnings,
        ..Emission::default()
    };
    for (bindings, modules) in rendered {
        emission.bindings.extend(bindings);
        emission.modules.extend(modules);
    }

    debug!(
        operations = plans.len(),
        targets = unique.len(),
        modules = emission.modules.len(),
        bindings = emission.bindings.len(),
        "Emitted bindings."
    );

    Ok(emission)
}

/// Route modules of one target, followed by its barrel.
fn render_target(
    adapter: &dyn TargetAdapter,
    plans: &[OperationPlan<'_>],
    options: &EmitOptions,
) -> (Vec<Binding>, Vec<GeneratedModule>) {
    // Route files in first-seen order.
    let mut groups: Vec<(String, Vec<&OperationPlan<'_>>)> = Vec::new();
    for plan in plans {
        let name = plan.synthesis.module_name();
        match groups.iter_mut().find(|(group, _)| *group == name) {
            Some((_, members)) => members.push(plan),
            None => groups.push((name, vec![plan])),
        }
    }

    let mut bindings = Vec::new();
    let mut modules = Vec::with_capacity(groups.len() + 1);
    for (name, members) in &groups {
        let (module, module_bindings) = render_module(adapter, members, options);
        bindings.extend(module_bindings);
        modules.push(GeneratedModule {
            target: adapter.name(),
            path: format!("{}/{name}.ts", adapter.name()),
            contents: module.emit(),
        });
    }

    let barrel = TsModule {
        header: vec![GENERATED_HEADER.to_string()],
        re_exports: groups.iter().map(|(name, _)| format!("./{name}")).collect(),
        ..TsModule::default()
    };
    modules.push(GeneratedModule {
        target: adapter.name(),
        path: format!("{}/index.ts", adapter.name()),
        contents: barrel.emit(),
    });

    debug!(
        adapter = adapter.name(),
        modules = modules.len(),
        "Rendered target."
    );

    (bindings, modules)
}

fn render_module(
    adapter: &dyn TargetAdapter,
    plans: &[&OperationPlan<'_>],
    options: &EmitOptions,
) -> (TsModule, Vec<Binding>) {
    let mut imports = ImportSet::default();
    imports.named(&options.runtime_module, bindings::CLIENT, false);
    imports.named(&options.runtime_module, bindings::INVOKE_AND_PARSE, false);
    imports.named(&options.runtime_module, bindings::CLIENT_OPTIONS_TYPE, true);

    let mut module = TsModule {
        header: vec![GENERATED_HEADER.to_string()],
        ..TsModule::default()
    };
    let mut schema_refs = Vec::new();
    let mut out = Vec::new();

    for plan in plans {
        let library = match plan.composed.class {
            OperationClass::Read => adapter.read_imports(plan.composed.requires_args),
            OperationClass::Write => adapter.write_imports(),
        };
        for import in library {
            imports.library(import);
        }

        if let Some(shape) = &plan.composed.arg_shape {
            shape.collect_refs(&mut schema_refs);
        }
        plan.composed.response.collect_refs(&mut schema_refs);

        module.types.extend(bindings::type_defs(plan));
        for (kind, function) in bindings::operation_functions(plan, adapter) {
            out.push(Binding {
                kind,
                identifier: function.name.clone(),
                cache_key: plan.synthesis.cache_key.clone(),
                target: adapter.name(),
                method: plan.operation.method,
                route_template: plan.synthesis.route_template.clone(),
                function: function.clone(),
            });
            module.functions.push(function);
        }
    }

    schema_refs.sort();
    let taken = local_names(&module, &imports);
    let mut renames = HashMap::new();
    for name in &schema_refs {
        if taken.contains(name) {
            let alias = schema_alias(name, &taken, &schema_refs);
            imports.aliased(&options.types_module, name, &alias);
            renames.insert(name.clone(), alias);
        } else {
            imports.named(&options.types_module, name, true);
        }
    }
    if !renames.is_empty() {
        debug!(renamed = renames.len(), "Aliased clashing schema imports.");
        for def in &mut module.types {
            def.ty.rename_refs(&renames);
        }
    }

    module.imports = imports.finish();
    (module, out)
}

/// Every identifier a module binds besides its schema imports.
fn local_names(module: &TsModule, imports: &ImportSet) -> HashSet<String> {
    let mut names: HashSet<String> = GLOBAL_TYPES.iter().map(ToString::to_string).collect();
    names.extend(module.types.iter().map(|def| def.name.clone()));
    names.extend(module.functions.iter().map(|function| function.name.clone()));
    for import in &imports.imports {
        names.extend(import.default.iter().cloned());
        names.extend(import.items.iter().map(|item| item.local_name().to_string()));
    }
    names
}

/// `<Name>Schema`, numbered when that is taken too.
fn schema_alias(name: &str, taken: &HashSet<String>, schema_refs: &[String]) -> String {
    let base = format!("{name}Schema");
    let mut alias = base.clone();
    let mut n = 2;
    while taken.contains(&alias) || schema_refs.contains(&alias) {
        alias = format!("{base}{n}");
        n += 1;
    }
    alias
}

/// Import statements grouped by module and kind, in first-use order.
#[derive(Debug, Default)]
struct ImportSet {
    imports: Vec<TsImport>,
}

impl ImportSet {
    fn entry(&mut self, from: &str, type_only: bool) -> &mut TsImport {
        let position = self
            .imports
            .iter()
            .position(|i| i.from == from && i.type_only == type_only);
        let index = match position {
            Some(index) => index,
            None => {
                self.imports.push(TsImport {
                    default: None,
                    items: Vec::new(),
                    from: from.to_string(),
                    type_only,
                });
                self.imports.len() - 1
            }
        };
        &mut self.imports[index]
    }

    fn named(&mut self, from: &str, name: &str, type_only: bool) {
        let entry = self.entry(from, type_only);
        if !entry.items.iter().any(|item| item.name == name) {
            entry.items.push(ImportItem::plain(name));
        }
    }

    fn aliased(&mut self, from: &str, name: &str, alias: &str) {
        let entry = self.entry(from, true);
        if !entry.items.iter().any(|item| item.name == name) {
            entry.items.push(ImportItem::aliased(name, alias));
        }
    }

    fn library(&mut self, import: LibraryImport) {
        match import {
            LibraryImport::Named { from, name } => self.named(from, name, false),
            LibraryImport::Type { from, name } => self.named(from, name, true),
            LibraryImport::Default { from, name } => {
                self.entry(from, false).default = Some(name.to_string());
            }
        }
    }

    fn finish(mut self) -> Vec<TsImport> {
        for import in &mut self.imports {
            import.items.sort_by(|a, b| a.name.cmp(&b.name));
        }
        self.imports
    }
}
