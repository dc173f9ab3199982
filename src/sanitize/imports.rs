//! Import binding collection and pruning
//!
//! A single walk over the parsed file records every top-level `use` leaf
//! and every name that could refer to one. Names that resolve to a local
//! declaration in the same file are not counted as references.

use std::collections::HashSet;

use proc_macro2::{TokenStream, TokenTree};
use syn::punctuated::Punctuated;
use syn::visit::{self, Visit};
use syn::{
    Arm, Attribute, Block, ExprClosure, ExprForLoop, ExprIf, ExprLet, ExprPath, ExprWhile, File,
    ImplItemFn, Item, ItemFn, ItemMod, ItemUse, Local, Macro, Meta, PatIdent, Path, Stmt,
    TraitItemFn, TypeParam, UseGroup, UsePath, UseTree, Visibility,
};

/// One leaf of a top-level `use` declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportBinding {
    /// Name the leaf binds in the file (`HashMap`, `fmt`, or the rename)
    pub alias: String,
    /// Full path of the imported item, `::`-separated
    pub path: String,
    /// Whether anything in the file refers to `alias`
    pub used: bool,
}

impl ImportBinding {
    fn leaf(prefix: &[String], ident: &str, rename: Option<&str>) -> Self {
        let (alias, path) = if ident == "self" {
            let alias = prefix.last().cloned().unwrap_or_else(|| ident.to_string());
            (alias, prefix.join("::"))
        } else {
            let mut segments = prefix.to_vec();
            segments.push(ident.to_string());
            (ident.to_string(), segments.join("::"))
        };

        Self {
            alias: rename.map(str::to_string).unwrap_or(alias),
            path,
            used: false,
        }
    }

    /// The identity used to match a leaf during pruning
    pub(crate) fn key(&self) -> (String, String) {
        (self.alias.clone(), self.path.clone())
    }
}

/// Walk `file` once and return its top-level private `use` leaves, each
/// marked with whether it's referenced
pub(crate) fn collect_bindings(file: &File) -> Vec<ImportBinding> {
    let mut collector = ReferenceCollector::default();
    collector.visit_file(file);
    collector.finish()
}

#[derive(Debug, Default)]
struct ReferenceCollector {
    bindings: Vec<ImportBinding>,
    /// Names that may refer to a top-level import
    refs: HashSet<String>,
    /// Declarations visible at the current point of the walk, innermost last
    scopes: Vec<Scope>,
}

/// Names declared by one lexical scope, by namespace
#[derive(Debug, Default)]
struct Scope {
    values: HashSet<String>,
    types: HashSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenSource {
    Macro,
    Attribute,
}

impl ReferenceCollector {
    fn finish(self) -> Vec<ImportBinding> {
        let Self {
            mut bindings, refs, ..
        } = self;

        for binding in &mut bindings {
            binding.used = refs.contains(&binding.alias);
        }

        bindings
    }

    fn declare_use(&mut self, item: &ItemUse) {
        // Re-exports are part of the module's interface, never pruned.
        if matches!(item.vis, Visibility::Inherited) {
            let mut prefix = Vec::new();
            declare_tree(&item.tree, &mut prefix, &mut self.bindings);
        }
        self.reference_use_root(item);
    }

    /// `use fmt::Write;` after `use std::fmt;` refers to the `fmt` binding
    fn reference_use_root(&mut self, item: &ItemUse) {
        if item.leading_colon.is_some() {
            return;
        }
        let mut roots = Vec::new();
        use_roots(&item.tree, &mut roots);
        self.refs.extend(roots);
    }

    fn with_scope(&mut self, walk: impl FnOnce(&mut Self)) {
        self.scopes.push(Scope::default());
        walk(self);
        self.scopes.pop();
    }

    fn current(&mut self) -> Option<&mut Scope> {
        self.scopes.last_mut()
    }

    fn resolves_value(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.values.contains(name))
    }

    fn resolves_type(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.types.contains(name))
    }

    fn reference_value(&mut self, name: String) {
        if !self.resolves_value(&name) {
            self.refs.insert(name);
        }
    }

    fn reference_type(&mut self, name: String) {
        if !self.resolves_type(&name) {
            self.refs.insert(name);
        }
    }

    /// Items are visible throughout the module or block declaring them, so
    /// they're bound before the walk enters any of them.
    fn declare_items<'a>(&mut self, items: impl IntoIterator<Item = &'a Item>) {
        let Some(scope) = self.current() else {
            return;
        };

        for item in items {
            match item {
                Item::Fn(item) => {
                    scope.values.insert(item.sig.ident.to_string());
                }
                Item::Const(item) => {
                    scope.values.insert(item.ident.to_string());
                }
                Item::Static(item) => {
                    scope.values.insert(item.ident.to_string());
                }
                Item::Struct(item) => {
                    // Tuple and unit structs also live in the value namespace
                    scope.types.insert(item.ident.to_string());
                    scope.values.insert(item.ident.to_string());
                }
                Item::Enum(item) => {
                    scope.types.insert(item.ident.to_string());
                }
                Item::Union(item) => {
                    scope.types.insert(item.ident.to_string());
                }
                Item::Trait(item) => {
                    scope.types.insert(item.ident.to_string());
                }
                Item::TraitAlias(item) => {
                    scope.types.insert(item.ident.to_string());
                }
                Item::Type(item) => {
                    scope.types.insert(item.ident.to_string());
                }
                Item::Mod(item) => {
                    scope.types.insert(item.ident.to_string());
                }
                Item::Macro(item) => {
                    if let Some(ident) = &item.ident {
                        scope.types.insert(ident.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    fn scan_tokens(&mut self, tokens: TokenStream, source: TokenSource) {
        for token in tokens {
            match token {
                TokenTree::Ident(ident) => {
                    self.refs.insert(ident.to_string());
                }
                TokenTree::Group(group) => self.scan_tokens(group.stream(), source),
                TokenTree::Literal(literal) => {
                    let text = literal.to_string();
                    match source {
                        // `format!("limit {LIMIT}")` captures `LIMIT`
                        TokenSource::Macro => self.refs.extend(format_captures(&text)),
                        // `#[serde(with = "ts_seconds")]` names a path in a string
                        TokenSource::Attribute => self.refs.extend(string_path_root(&text)),
                    }
                }
                TokenTree::Punct(_) => {}
            }
        }
    }
}

impl<'ast> Visit<'ast> for ReferenceCollector {
    fn visit_file(&mut self, file: &'ast File) {
        self.with_scope(|v| {
            v.declare_items(&file.items);
            for attr in &file.attrs {
                v.visit_attribute(attr);
            }
            for item in &file.items {
                match item {
                    Item::Use(item_use) => v.declare_use(item_use),
                    _ => v.visit_item(item),
                }
            }
        });
    }

    fn visit_item(&mut self, item: &'ast Item) {
        // Generic parameters are scoped to their item
        self.with_scope(|v| visit::visit_item(v, item));
    }

    fn visit_item_mod(&mut self, item: &'ast ItemMod) {
        self.with_scope(|v| {
            if let Some((_, items)) = &item.content {
                v.declare_items(items);
            }
            visit::visit_item_mod(v, item);
        });
    }

    fn visit_item_use(&mut self, item: &'ast ItemUse) {
        // Nested `use` declarations aren't pruned, but they can name a
        // top-level binding as their root.
        self.reference_use_root(item);
    }

    fn visit_item_fn(&mut self, item: &'ast ItemFn) {
        self.with_scope(|v| visit::visit_item_fn(v, item));
    }

    fn visit_impl_item_fn(&mut self, item: &'ast ImplItemFn) {
        self.with_scope(|v| visit::visit_impl_item_fn(v, item));
    }

    fn visit_trait_item_fn(&mut self, item: &'ast TraitItemFn) {
        self.with_scope(|v| visit::visit_trait_item_fn(v, item));
    }

    fn visit_expr_closure(&mut self, expr: &'ast ExprClosure) {
        self.with_scope(|v| visit::visit_expr_closure(v, expr));
    }

    fn visit_block(&mut self, block: &'ast Block) {
        self.with_scope(|v| {
            v.declare_items(block.stmts.iter().filter_map(|stmt| match stmt {
                Stmt::Item(item) => Some(item),
                _ => None,
            }));
            visit::visit_block(v, block);
        });
    }

    fn visit_arm(&mut self, arm: &'ast Arm) {
        self.with_scope(|v| visit::visit_arm(v, arm));
    }

    fn visit_expr_if(&mut self, expr: &'ast ExprIf) {
        for attr in &expr.attrs {
            self.visit_attribute(attr);
        }
        // `if let` bindings are only visible in the then branch
        self.with_scope(|v| {
            v.visit_expr(&expr.cond);
            v.visit_block(&expr.then_branch);
        });
        if let Some((_, else_branch)) = &expr.else_branch {
            self.visit_expr(else_branch);
        }
    }

    fn visit_expr_while(&mut self, expr: &'ast ExprWhile) {
        for attr in &expr.attrs {
            self.visit_attribute(attr);
        }
        self.with_scope(|v| {
            v.visit_expr(&expr.cond);
            v.visit_block(&expr.body);
        });
    }

    fn visit_expr_for_loop(&mut self, expr: &'ast ExprForLoop) {
        for attr in &expr.attrs {
            self.visit_attribute(attr);
        }
        self.visit_expr(&expr.expr);
        self.with_scope(|v| {
            v.visit_pat(&expr.pat);
            v.visit_block(&expr.body);
        });
    }

    fn visit_expr_let(&mut self, expr: &'ast ExprLet) {
        for attr in &expr.attrs {
            self.visit_attribute(attr);
        }
        self.visit_expr(&expr.expr);
        self.visit_pat(&expr.pat);
    }

    fn visit_local(&mut self, local: &'ast Local) {
        // The initializer can't see the binding it initializes:
        // `let max = max(a, b);` refers to an imported `max`.
        for attr in &local.attrs {
            self.visit_attribute(attr);
        }
        if let Some(init) = &local.init {
            self.visit_local_init(init);
        }
        self.visit_pat(&local.pat);
    }

    fn visit_pat_ident(&mut self, pat: &'ast PatIdent) {
        let name = pat.ident.to_string();
        // An uppercase identifier pattern is almost always a unit struct,
        // variant or constant being matched, not a new binding.
        if name.starts_with(char::is_uppercase) {
            self.reference_value(name);
        } else if let Some(scope) = self.current() {
            scope.values.insert(name);
        }
        visit::visit_pat_ident(self, pat);
    }

    fn visit_type_param(&mut self, param: &'ast TypeParam) {
        if let Some(scope) = self.current() {
            scope.types.insert(param.ident.to_string());
        }
        visit::visit_type_param(self, param);
    }

    fn visit_expr_path(&mut self, expr: &'ast ExprPath) {
        let single = expr.qself.is_none()
            && expr.path.leading_colon.is_none()
            && expr.path.segments.len() == 1;
        if !single {
            visit::visit_expr_path(self, expr);
            return;
        }

        for attr in &expr.attrs {
            self.visit_attribute(attr);
        }
        let segment = &expr.path.segments[0];
        self.reference_value(segment.ident.to_string());
        self.visit_path_arguments(&segment.arguments);
    }

    fn visit_path(&mut self, path: &'ast Path) {
        if path.leading_colon.is_none() {
            if let Some(first) = path.segments.first() {
                self.reference_type(first.ident.to_string());
            }
        }
        visit::visit_path(self, path);
    }

    fn visit_macro(&mut self, mac: &'ast Macro) {
        self.visit_path(&mac.path);
        self.scan_tokens(mac.tokens.clone(), TokenSource::Macro);
    }

    fn visit_attribute(&mut self, attr: &'ast Attribute) {
        match &attr.meta {
            Meta::Path(path) => self.visit_path(path),
            Meta::List(list) => {
                self.visit_path(&list.path);
                self.scan_tokens(list.tokens.clone(), TokenSource::Attribute);
            }
            Meta::NameValue(name_value) => {
                self.visit_path(&name_value.path);
                self.visit_expr(&name_value.value);
            }
        }
    }
}

fn declare_tree(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Vec<ImportBinding>) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            declare_tree(&path.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(name) => out.push(ImportBinding::leaf(prefix, &name.ident.to_string(), None)),
        UseTree::Rename(rename) => out.push(ImportBinding::leaf(
            prefix,
            &rename.ident.to_string(),
            Some(&rename.rename.to_string()),
        )),
        // A glob binds no single name, so there is nothing to prune.
        UseTree::Glob(_) => {}
        UseTree::Group(group) => {
            for item in &group.items {
                declare_tree(item, prefix, out);
            }
        }
    }
}

fn use_roots(tree: &UseTree, out: &mut Vec<String>) {
    match tree {
        UseTree::Path(path) => out.push(path.ident.to_string()),
        UseTree::Name(name) => out.push(name.ident.to_string()),
        UseTree::Rename(rename) => out.push(rename.ident.to_string()),
        UseTree::Glob(_) => {}
        UseTree::Group(group) => {
            for item in &group.items {
                use_roots(item, out);
            }
        }
    }
}

fn string_path_root(literal: &str) -> Option<String> {
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    let root: String = inner
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();

    if root.is_empty() {
        None
    } else {
        Some(root)
    }
}

/// Names captured implicitly by a format string: `{name}` or `{name:spec}`
fn format_captures(literal: &str) -> Vec<String> {
    let mut captures = Vec::new();
    let mut chars = literal.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '{' {
            continue;
        }
        if chars.peek() == Some(&'{') {
            chars.next();
            continue;
        }

        let name: String =
            std::iter::from_fn(|| chars.next_if(|c| c.is_alphanumeric() || *c == '_')).collect();
        let is_ident = name.starts_with(|c: char| c.is_alphabetic() || c == '_');
        if is_ident && matches!(chars.peek(), Some(&'}') | Some(&':')) {
            captures.push(name);
        }
    }

    captures
}

/// Remove every `use` leaf whose `(alias, path)` is in `unused`
///
/// Groups left empty disappear along with `use` items left empty. A group
/// reduced to a single leaf by pruning is collapsed into a plain path.
/// Returns the number of leaves removed.
pub(crate) fn prune(file: &mut File, unused: &HashSet<(String, String)>) -> usize {
    if unused.is_empty() {
        return 0;
    }

    let mut removed = 0;
    file.items.retain_mut(|item| {
        let Item::Use(item_use) = item else {
            return true;
        };
        if !matches!(item_use.vis, Visibility::Inherited) {
            return true;
        }

        let mut prefix = Vec::new();
        match prune_tree(&item_use.tree, &mut prefix, unused, &mut removed) {
            Some(tree) => {
                item_use.tree = tree;
                true
            }
            None => false,
        }
    });

    removed
}

fn prune_tree(
    tree: &UseTree,
    prefix: &mut Vec<String>,
    unused: &HashSet<(String, String)>,
    removed: &mut usize,
) -> Option<UseTree> {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            let inner = prune_tree(&path.tree, prefix, unused, removed);
            prefix.pop();

            Some(UseTree::Path(UsePath {
                ident: path.ident.clone(),
                colon2_token: path.colon2_token,
                tree: Box::new(inner?),
            }))
        }
        UseTree::Name(name) => {
            let leaf = ImportBinding::leaf(prefix, &name.ident.to_string(), None);
            keep_leaf(tree, &leaf, unused, removed)
        }
        UseTree::Rename(rename) => {
            let leaf = ImportBinding::leaf(
                prefix,
                &rename.ident.to_string(),
                Some(&rename.rename.to_string()),
            );
            keep_leaf(tree, &leaf, unused, removed)
        }
        UseTree::Glob(_) => Some(tree.clone()),
        UseTree::Group(group) => {
            let before = *removed;
            let items: Punctuated<UseTree, syn::Token![,]> = group
                .items
                .iter()
                .filter_map(|item| prune_tree(item, prefix, unused, removed))
                .collect();

            if items.is_empty() {
                return None;
            }
            if items.len() == 1 && *removed > before && !is_self_leaf(&items[0]) {
                return items.into_iter().next();
            }

            Some(UseTree::Group(UseGroup {
                brace_token: group.brace_token,
                items,
            }))
        }
    }
}

fn keep_leaf(
    tree: &UseTree,
    leaf: &ImportBinding,
    unused: &HashSet<(String, String)>,
    removed: &mut usize,
) -> Option<UseTree> {
    if unused.contains(&leaf.key()) {
        *removed += 1;
        None
    } else {
        Some(tree.clone())
    }
}

/// `{self}` can't be flattened into the parent path
fn is_self_leaf(tree: &UseTree) -> bool {
    match tree {
        UseTree::Name(name) => name.ident == "self",
        UseTree::Rename(rename) => rename.ident == "self",
        _ => false,
    }
}
