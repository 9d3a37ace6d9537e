use std::collections::HashMap;

use env_logger::Env;
use grove_libtree::{
    BrowserCommand, BrowserConfig, BrowserEffect, NodeDescriptor, NodeKind,
    NodePath, NodeSource, SourceError, TreeBrowser, run,
};

/// In-memory namespace standing in for the remote endpoint.
struct MemoryNamespace {
    children: HashMap<String, Vec<String>>,
}

impl MemoryNamespace {
    fn new() -> Self {
        let mut children = HashMap::new();
        for (path, names) in [
            ("/content", vec!["site", "assets"]),
            ("/content/site", vec!["en", "de"]),
            ("/content/site/en", vec!["home", "news"]),
            ("/content/site/de", vec!["home"]),
            ("/content/assets", vec!["logo.png"]),
        ] {
            children.insert(
                path.to_string(),
                names.into_iter().map(str::to_string).collect(),
            );
        }
        Self { children }
    }

    fn insert(&mut self, parent: &str, name: &str) {
        if let Some(names) = self.children.get_mut(parent) {
            names.push(name.to_string());
        }
    }

    fn delete(&mut self, parent: &str, name: &str) {
        if let Some(names) = self.children.get_mut(parent) {
            names.retain(|entry| entry != name);
        }
    }
}

impl NodeSource for MemoryNamespace {
    fn fetch(
        &self,
        path: &NodePath,
        _filter: Option<&str>,
    ) -> Result<NodeDescriptor, SourceError> {
        let names = self.children.get(path.as_str()).ok_or_else(|| {
            SourceError::Fetch(format!("no such entry: {path}"))
        })?;

        let mut descriptor =
            NodeDescriptor::new(path.clone(), NodeKind::Container);
        descriptor.children = names
            .iter()
            .map(|name| {
                let child = path.join(name);
                let kind = if self.children.contains_key(child.as_str()) {
                    NodeKind::Container
                } else {
                    NodeKind::Leaf
                };
                NodeDescriptor::new(child, kind)
            })
            .collect();
        Ok(descriptor)
    }
}

fn report(step: &str, effects: &[BrowserEffect]) {
    println!("== {step}");
    for effect in effects {
        match effect {
            BrowserEffect::SelectionChanged { path, .. } => {
                println!("   selection changed -> {path}");
            },
            BrowserEffect::FocusNode { path } => {
                println!("   focus -> {path}");
            },
            BrowserEffect::ScrollIntoView { path } => {
                println!("   scroll into view -> {path}");
            },
            BrowserEffect::OperationCompleted { reason, selected } => {
                println!(
                    "   completed \"{reason}\" (selected: {})",
                    selected
                        .as_ref()
                        .map(|path| path.as_str())
                        .unwrap_or("none")
                );
            },
            other => println!("   {other:?}"),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut namespace = MemoryNamespace::new();
    let mut browser = TreeBrowser::new(
        BrowserConfig::new().with_root(NodePath::new("/content")),
    );

    // 1. Initial root load.
    let effects = run(
        &mut browser,
        &namespace,
        BrowserCommand::SetRoot {
            root: NodePath::new("/content"),
        },
    );
    report("boot", &effects);

    // 2. Drill down to a deep path; every closed ancestor loads lazily.
    let effects = run(
        &mut browser,
        &namespace,
        BrowserCommand::SelectNode {
            path: NodePath::new("/content/site/en/news"),
            suppress_notification: false,
            origin: None,
        },
    );
    report("drill-down", &effects);

    // 3. A create dialog elsewhere added a node; reconcile it.
    namespace.insert("/content/site/en", "blog");
    let effects = run(
        &mut browser,
        &namespace,
        BrowserCommand::Inserted {
            parent: NodePath::new("/content/site/en"),
            name: String::from("blog"),
        },
    );
    report("inserted", &effects);

    // 4. The selected node is deleted remotely; selection falls back to
    //    the nearest sibling.
    namespace.delete("/content/site/en", "news");
    let effects = run(
        &mut browser,
        &namespace,
        BrowserCommand::Deleted {
            path: NodePath::new("/content/site/en/news"),
            replacement: None,
        },
    );
    report("deleted", &effects);

    println!(
        "final selection: {}",
        browser
            .selected_path()
            .map(|path| path.as_str())
            .unwrap_or("none")
    );
}
