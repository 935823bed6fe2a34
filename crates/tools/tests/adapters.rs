#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use common::SpyInvoker;
use secops_tools::tools::*;
use secops_tools::*;
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

fn profile(image: &str) -> ToolProfile {
    ToolProfile {
        image: image.to_string(),
        timeout: Duration::from_secs(120),
        data_dir: PathBuf::from("/srv/secops"),
    }
}

#[tokio::test]
async fn test_nuclei_command() {
    let tool = NucleiTool::new(profile("nuclei:test"));
    let spy = SpyInvoker::with_stdout(
        "{\"template-id\":\"tech-detect\",\"info\":{\"severity\":\"info\"}}\n",
    );

    let results = tool
        .execute(
            spy.as_ref(),
            json!({"target": "https://example.com", "templates": ["http/cves"], "severity": "critical,high"}),
        )
        .await
        .unwrap();

    let spec = spy.last();
    assert_eq!(spec.image(), "nuclei:test");
    assert_eq!(spec.flag_value("-u"), Some("https://example.com"));
    assert_eq!(spec.flag_value("-t"), Some("http/cves"));
    assert_eq!(spec.flag_value("-severity"), Some("critical,high"));
    assert!(spec.has_arg("-jsonl"));
    assert_eq!(spec.timeout(), Duration::from_secs(120));
    assert_eq!(results["findings"][0]["template-id"], "tech-detect");
}

#[tokio::test]
async fn test_nuclei_text_output() {
    let tool = NucleiTool::new(profile("nuclei:test"));
    let spy = SpyInvoker::with_stdout("[tech-detect] https://example.com\n");

    let results = tool
        .execute(spy.as_ref(), json!({"target": "example.com", "output_format": "text"}))
        .await
        .unwrap();

    assert!(!spy.last().has_arg("-jsonl"));
    assert_eq!(results["findings"], json!(["[tech-detect] https://example.com"]));
}

#[tokio::test]
async fn test_nuclei_template_traversal_rejected() {
    let tool = NucleiTool::new(profile("nuclei:test"));
    let spy = SpyInvoker::with_stdout("");

    let err = tool
        .execute(
            spy.as_ref(),
            json!({"target": "example.com", "templates": ["http/cves", "../../root"]}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_ffuf_requires_fuzz_marker() {
    let tool = FfufTool::new(profile("ffuf:test"));
    let spy = SpyInvoker::with_stdout("{}");

    let err = tool
        .execute(spy.as_ref(), json!({"url": "http://example.com/"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_ffuf_defaults_and_mounts() {
    let tool = FfufTool::new(profile("ffuf:test"));
    let spy = SpyInvoker::with_stdout(r#"{"results":[{"input":{"FUZZ":"admin"},"status":200}]}"#);

    let results = tool
        .execute(spy.as_ref(), json!({"url": "http://x/FUZZ"}))
        .await
        .unwrap();

    let spec = spy.last();
    assert_eq!(spec.flag_value("-w"), Some("/app/wordlists/directories.txt"));
    assert_eq!(spec.flag_value("-fc"), Some("404"));
    assert_eq!(spec.flag_value("-of"), Some("json"));
    assert_eq!(spec.mounts().len(), 1);
    assert_eq!(spec.mounts()[0].host, PathBuf::from("/srv/secops/ffuf/wordlists"));
    assert_eq!(spec.mounts()[0].container, "/app/wordlists");
    assert_eq!(results["url"], "http://x/FUZZ");
    assert_eq!(results["results"]["results"][0]["status"], 200);
}

#[tokio::test]
async fn test_ffuf_rejects_wordlist_traversal() {
    let tool = FfufTool::new(profile("ffuf:test"));
    let spy = SpyInvoker::with_stdout("{}");

    let err = tool
        .execute(
            spy.as_ref(),
            json!({"url": "http://x/FUZZ", "wordlist": "../../etc/shadow"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
    assert!(spy.calls().is_empty());
}

#[tokio::test]
async fn test_nmap_command() {
    let tool = NmapTool::new(profile("nmap:test"));
    let spy = SpyInvoker::with_stdout("<nmaprun></nmaprun>");

    let results = tool
        .execute(spy.as_ref(), json!({"target": "10.0.0.1", "ports": "22,80"}))
        .await
        .unwrap();

    let spec = spy.last();
    assert_eq!(spec.args()[0], "nmap");
    assert!(spec.has_arg("-sV"));
    assert_eq!(spec.flag_value("-p"), Some("22,80"));
    assert_eq!(spec.args().last().map(String::as_str), Some("10.0.0.1"));
    assert_eq!(results["output"], "<nmaprun></nmaprun>");
    assert_eq!(results["scan_type"], "sV");
}

#[tokio::test]
async fn test_nmap_rejects_flag_as_target() {
    let tool = NmapTool::new(profile("nmap:test"));
    let spy = SpyInvoker::with_stdout("");
    let err = tool
        .execute(spy.as_ref(), json!({"target": "--script=/tmp/x.nse"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}

#[tokio::test]
async fn test_sqlmap_defaults_and_bounds() {
    let tool = SqlmapTool::new(profile("sqlmap:test"));
    let spy = SpyInvoker::with_stdout("[*] ending");

    let results = tool
        .execute(spy.as_ref(), json!({"url": "http://x/?id=1"}))
        .await
        .unwrap();
    let spec = spy.last();
    assert!(spec.has_arg("--risk=1"));
    assert!(spec.has_arg("--level=1"));
    assert!(spec.has_arg("--batch"));
    assert!(!spec.mounts()[0].read_only);
    assert_eq!(results["output"], "[*] ending");

    let err = tool
        .execute(spy.as_ref(), json!({"url": "http://x/?id=1", "risk": 4}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));

    let err = tool
        .execute(spy.as_ref(), json!({"url": "http://x/?id=1", "level": 0}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}

#[tokio::test]
async fn test_wpscan_token_and_formats() {
    let tool = WpscanTool::new(profile("wpscan:test"));
    let spy = SpyInvoker::with_stdout(r#"{"version":{"number":"6.4"}}"#);

    let results = tool
        .execute(
            spy.as_ref(),
            json!({"target": "https://blog.example.com", "api_token": "abc123"}),
        )
        .await
        .unwrap();
    let spec = spy.last();
    assert_eq!(spec.flag_value("--api-token"), Some("abc123"));
    assert_eq!(spec.flag_value("--format"), Some("json"));
    assert_eq!(results["report"]["version"]["number"], "6.4");

    let spy = SpyInvoker::with_stdout("[+] URL: https://blog.example.com/");
    let results = tool
        .execute(
            spy.as_ref(),
            json!({"target": "https://blog.example.com", "output_format": "cli-no-color"}),
        )
        .await
        .unwrap();
    assert!(spy.last().flag_value("--api-token").is_none());
    assert_eq!(results["report"], "[+] URL: https://blog.example.com/");
}

#[tokio::test]
async fn test_amass_passive_default() {
    let tool = AmassTool::new(profile("amass:test"));
    let spy = SpyInvoker::with_stdout("b.example.com\na.example.com\n\na.example.com\n");

    let results = tool
        .execute(spy.as_ref(), json!({"domain": "example.com"}))
        .await
        .unwrap();
    assert!(spy.last().has_arg("-passive"));
    assert_eq!(results["subdomains"], json!(["a.example.com", "b.example.com"]));

    tool.execute(spy.as_ref(), json!({"domain": "example.com", "passive": false}))
        .await
        .unwrap();
    assert!(!spy.last().has_arg("-passive"));
}

#[tokio::test]
async fn test_hashcat_exhausted_is_success() {
    let tool = HashcatTool::new(profile("hashcat:test"));
    let spy = SpyInvoker::new(ProcessResult {
        exit_status: Some(1),
        stdout: String::new(),
        ..Default::default()
    });

    let results = tool
        .execute(
            spy.as_ref(),
            json!({"hash_file": "md5.txt", "wordlist": "rockyou.txt", "hash_type": 1000}),
        )
        .await
        .unwrap();

    let spec = spy.last();
    assert_eq!(spec.flag_value("-m"), Some("1000"));
    assert_eq!(spec.devices(), ["/dev/dri"]);
    assert!(spec.has_arg("/app/hashes/md5.txt"));
    assert!(spec.has_arg("/app/wordlists/rockyou.txt"));
    assert_eq!(results["exhausted"], true);
    assert_eq!(results["cracked_hashes"], json!([]));
}

#[tokio::test]
async fn test_hashcat_cracked_lines() {
    let tool = HashcatTool::new(profile("hashcat:test"));
    let spy = SpyInvoker::with_stdout("password\nletmein\n");

    let results = tool
        .execute(
            spy.as_ref(),
            json!({"hash_file": "md5.txt", "wordlist": "rockyou.txt", "hash_type": "0"}),
        )
        .await
        .unwrap();
    assert_eq!(results["mode"], 0);
    assert_eq!(results["cracked_hashes"], json!(["password", "letmein"]));

    let err = tool
        .execute(
            spy.as_ref(),
            json!({"hash_file": "md5.txt", "wordlist": "rockyou.txt", "hash_type": "md5"}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}

#[tokio::test]
async fn test_httpx_batches_urls() {
    let tool = HttpxTool::new(profile("httpx:test"));
    let spy = SpyInvoker::with_stdout("{\"url\":\"https://a\",\"status_code\":200}\n");

    let results = tool
        .execute(
            spy.as_ref(),
            json!({"urls": ["https://a", "https://b"], "status_codes": [200, 301]}),
        )
        .await
        .unwrap();

    let spec = spy.last();
    assert_eq!(spec.flag_value("-u"), Some("https://a,https://b"));
    assert_eq!(spec.flag_value("-mc"), Some("200,301"));
    assert_eq!(results["results"][0]["status_code"], 200);

    let err = tool
        .execute(spy.as_ref(), json!({"urls": []}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}

#[tokio::test]
async fn test_subfinder_recursive_flag() {
    let tool = SubfinderTool::new(profile("subfinder:test"));
    let spy = SpyInvoker::with_stdout("{\"host\":\"x.example.com\"}\n");

    let results = tool
        .execute(spy.as_ref(), json!({"domain": "example.com", "recursive": true}))
        .await
        .unwrap();
    assert!(spy.last().has_arg("-recursive"));
    assert_eq!(results["subdomains"], json!(["x.example.com"]));
}

#[tokio::test]
async fn test_tlsx_port_default() {
    let tool = TlsxTool::new(profile("tlsx:test"));
    let spy = SpyInvoker::with_stdout("{\"host\":\"example.com\",\"tls_version\":\"tls13\"}\n");

    let results = tool
        .execute(spy.as_ref(), json!({"host": "example.com"}))
        .await
        .unwrap();
    assert_eq!(spy.last().flag_value("-p"), Some("443"));
    assert_eq!(results["port"], 443);
    assert_eq!(results["results"][0]["tls_version"], "tls13");

    let err = tool
        .execute(spy.as_ref(), json!({"host": "example.com", "port": 70000}))
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Validation(_)));
}

#[tokio::test]
async fn test_dirsearch_optional_wordlist() {
    let tool = DirsearchTool::new(profile("dirsearch:test"));
    let spy = SpyInvoker::with_stdout(r#"{"results":[]}"#);

    tool.execute(spy.as_ref(), json!({"url": "https://example.com"}))
        .await
        .unwrap();
    let spec = spy.last();
    assert!(spec.mounts().is_empty());
    assert!(spec.flag_value("-e").is_none());

    let results = tool
        .execute(
            spy.as_ref(),
            json!({"url": "https://example.com", "extensions": [".php", "bak"], "wordlist": "big.txt"}),
        )
        .await
        .unwrap();
    let spec = spy.last();
    assert_eq!(spec.flag_value("-e"), Some("php,bak"));
    assert_eq!(spec.flag_value("-w"), Some("/app/wordlists/big.txt"));
    assert_eq!(spec.mounts()[0].host, PathBuf::from("/srv/secops/dirsearch/wordlists"));
    assert_eq!(results["wordlist"], "big.txt");
}

#[tokio::test]
async fn test_unknown_argument_rejected() {
    let tool = TlsxTool::new(profile("tlsx:test"));
    let spy = SpyInvoker::with_stdout("");
    let err = tool
        .execute(spy.as_ref(), json!({"host": "example.com", "sni": "evil"}))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("unknown field"));
}

#[test]
fn test_schemas_list_required_fields() {
    let registry = ToolRegistryImpl::with_catalog(&SandboxSettings::default());
    assert_eq!(registry.count(), 13);

    for schema in registry.schemas() {
        let name = schema["name"].as_str().unwrap();
        assert!(!schema["description"].as_str().unwrap().is_empty(), "{name}");
        assert_eq!(schema["inputSchema"]["type"], "object", "{name}");
        assert!(schema["inputSchema"]["required"].as_array().is_some(), "{name}");
    }
}
