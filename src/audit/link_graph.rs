use std::collections::{BTreeMap, BTreeSet};

/// Directed internal-link graph over the pages of one build.
///
/// Every known page is seeded as a node before edges are added, so pages
/// without any links are still represented (with empty adjacency).
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    outbound: BTreeMap<String, BTreeSet<String>>,
    inbound: BTreeMap<String, BTreeSet<String>>,
}

impl LinkGraph {
    pub fn new<'a>(urls: impl IntoIterator<Item = &'a str>) -> Self {
        let mut graph = Self::default();
        for url in urls {
            graph.outbound.entry(url.to_string()).or_default();
            graph.inbound.entry(url.to_string()).or_default();
        }
        graph
    }

    pub fn contains(&self, url: &str) -> bool {
        self.inbound.contains_key(url)
    }

    /// Records `from -> to`. Inbound edges are kept only for known targets
    /// and never for self-links.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        if let Some(targets) = self.outbound.get_mut(from) {
            targets.insert(to.to_string());
        }
        if from == to {
            return;
        }
        if let Some(sources) = self.inbound.get_mut(to) {
            sources.insert(from.to_string());
        }
    }

    pub fn outbound(&self, url: &str) -> Option<&BTreeSet<String>> {
        self.outbound.get(url)
    }

    /// Known pages with no inbound edges, excluding `exempt`.
    pub fn orphans(&self, exempt: &[String]) -> Vec<String> {
        self.inbound
            .iter()
            .filter(|(url, sources)| sources.is_empty() && !exempt.iter().any(|skip| skip == *url))
            .map(|(url, _)| url.clone())
            .collect()
    }
}

/// Normalizes a root-relative path: extensionless paths without a trailing
/// slash get one appended. Returns the path and whether it was changed.
pub fn normalize_internal_href(path: &str) -> (String, bool) {
    if path.starts_with('/') && !path.ends_with('/') && !path.contains('.') {
        (format!("{path}/"), true)
    } else {
        (path.to_string(), false)
    }
}
