// Copyright (c) the jsonnet-tool contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Listing of `import` and `importstr` expressions.
//!
//! Paths are reported as written; nothing is resolved or read.

use std::fmt;

use serde::Serialize;
use tracing::{debug, trace};

use crate::nodes::{LocationRange, Node, NodeKind};
use crate::traverse::{HookResult, Traversal, TraversalError, TraversalHooks};

/// Which import form was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Import,
    ImportStr,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Import => "import",
            ImportKind::ImportStr => "importstr",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One import expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRef {
    pub kind: ImportKind,
    pub path: String,
    pub location: LocationRange,
}

/// Pre-order hook that records imports in source order.
#[derive(Debug, Default)]
pub struct ImportCollector {
    imports: Vec<ImportRef>,
}

impl ImportCollector {
    pub fn collect(root: &Node, traversal: &Traversal) -> Result<Vec<ImportRef>, TraversalError> {
        let mut collector = ImportCollector::default();
        traversal.run(root, &mut collector)?;
        Ok(collector.imports)
    }
}

impl<'t> TraversalHooks<'t> for ImportCollector {
    fn pre(&mut self, node: &'t Node) -> HookResult {
        let (kind, import) = match &node.kind {
            NodeKind::Import(import) => (ImportKind::Import, import),
            NodeKind::ImportStr(import) => (ImportKind::ImportStr, import),
            _ => return Ok(()),
        };
        let Some(path) = import.path() else {
            return Err(format!("{kind} of a non-literal path").into());
        };
        trace!(%kind, path, "found import");
        self.imports.push(ImportRef {
            kind,
            path: path.to_string(),
            location: node.loc.clone(),
        });
        Ok(())
    }
}

/// List every import under `root` in source order.
pub fn find_imports(root: &Node, traversal: &Traversal) -> Result<Vec<ImportRef>, TraversalError> {
    let imports = ImportCollector::collect(root, traversal)?;
    debug!(count = imports.len(), "found imports");
    Ok(imports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::*;
    use crate::nodes::{BinaryOp, Import};
    use crate::traverse::Phase;

    #[test]
    fn imports_in_source_order() {
        let root = local(
            vec![("lib", import("lib.libsonnet"))],
            binary(var("lib"), BinaryOp::Plus, importstr("data.txt")),
        );
        let imports = find_imports(&root, &Traversal::default()).unwrap();
        let found: Vec<_> = imports
            .iter()
            .map(|i| (i.kind.as_str(), i.path.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![("import", "lib.libsonnet"), ("importstr", "data.txt")]
        );
    }

    #[test]
    fn non_literal_path_is_a_pre_error() {
        let root = Node::new(NodeKind::Import(Import {
            file: Box::new(var("path")),
        }));
        let err = find_imports(&root, &Traversal::default()).unwrap_err();
        assert_eq!(err.phase(), Some(Phase::Pre));
        assert!(err.to_string().contains("import of a non-literal path"));
    }
}
