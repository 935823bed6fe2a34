use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use serde_json::{json, Value};
use crate::settings::SandboxSettings;
use crate::tools::*;

/// Tools reported by status queries, in presentation order.
pub const CATALOG: [&str; 12] = [
    "nuclei", "ffuf", "nmap", "sqlmap", "wpscan", "amass", "hashcat", "httpx", "subfinder",
    "tlsx", "dirsearch", "xsstrike",
];

/// Every tool the gateway can run. Cataloged tools appear in status
/// reports; aliases are dispatchable only.
pub struct ToolRegistryImpl {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    catalog: BTreeSet<String>,
}

impl ToolRegistryImpl {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
            catalog: BTreeSet::new(),
        }
    }

    /// The standard scanner set, with images and bounds from `settings`.
    pub fn with_catalog(settings: &SandboxSettings) -> Self {
        let mut registry = Self::new();
        registry
            .register(Arc::new(NucleiTool::new(settings.profile("nuclei", nuclei::DEFAULT_IMAGE, None))))
            .register(Arc::new(FfufTool::new(settings.profile("ffuf", ffuf::DEFAULT_IMAGE, None))))
            .register(Arc::new(NmapTool::new(settings.profile("nmap", nmap::DEFAULT_IMAGE, None))))
            .register(Arc::new(SqlmapTool::new(settings.profile("sqlmap", sqlmap::DEFAULT_IMAGE, None))))
            .register(Arc::new(WpscanTool::new(settings.profile(
                "wpscan",
                wpscan::DEFAULT_IMAGE,
                Some(wpscan::TIMEOUT_SECS),
            ))))
            .register(Arc::new(AmassTool::new(settings.profile("amass", amass::DEFAULT_IMAGE, None))))
            .register(Arc::new(HashcatTool::new(settings.profile("hashcat", hashcat::DEFAULT_IMAGE, None))))
            .register(Arc::new(HttpxTool::new(settings.profile("httpx", httpx::DEFAULT_IMAGE, None))))
            .register(Arc::new(SubfinderTool::new(settings.profile(
                "subfinder",
                subfinder::DEFAULT_IMAGE,
                None,
            ))))
            .register(Arc::new(TlsxTool::new(settings.profile("tlsx", tlsx::DEFAULT_IMAGE, None))))
            .register(Arc::new(DirsearchTool::new(settings.profile(
                "dirsearch",
                dirsearch::DEFAULT_IMAGE,
                None,
            ))))
            .register(Arc::new(XsstrikeTool::new(settings.profile(
                "xsstrike",
                xsstrike::DEFAULT_IMAGE,
                None,
            ))))
            .register_alias(Arc::new(WfuzzTool::new(settings.profile("wfuzz", ffuf::DEFAULT_IMAGE, None))));

        assert!(
            CATALOG.iter().all(|name| registry.is_cataloged(name)) && registry.catalog.len() == CATALOG.len(),
            "tool catalog does not match registered tools"
        );
        registry
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.catalog.insert(tool.name().to_string());
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn register_alias(&mut self, tool: Arc<dyn Tool>) -> &mut Self {
        self.tools.insert(tool.name().to_string(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    pub fn is_cataloged(&self, name: &str) -> bool {
        self.catalog.contains(name)
    }

    /// Cataloged names, in [`CATALOG`] order first.
    pub fn catalog(&self) -> Vec<String> {
        let mut names: Vec<String> = CATALOG
            .iter()
            .filter(|name| self.catalog.contains(**name))
            .map(|name| name.to_string())
            .collect();
        names.extend(
            self.catalog
                .iter()
                .filter(|name| !CATALOG.contains(&name.as_str()))
                .cloned(),
        );
        names
    }

    pub fn list(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }

    pub fn count(&self) -> usize {
        self.tools.len()
    }

    pub fn schemas(&self) -> Vec<Value> {
        self.tools
            .values()
            .map(|tool| {
                json!({
                    "name": tool.name(),
                    "description": tool.description(),
                    "inputSchema": tool.schema()
                })
            })
            .collect()
    }
}

impl Default for ToolRegistryImpl {
    fn default() -> Self {
        Self::new()
    }
}
