pub mod amass;
pub mod base;
pub mod dirsearch;
pub mod ffuf;
pub mod hashcat;
pub mod httpx;
pub mod nmap;
pub mod nuclei;
pub mod sqlmap;
pub mod subfinder;
pub mod tlsx;
pub mod wfuzz;
pub mod wpscan;
pub mod xsstrike;

pub use amass::AmassTool;
pub use base::Tool;
pub use dirsearch::DirsearchTool;
pub use ffuf::FfufTool;
pub use hashcat::HashcatTool;
pub use httpx::HttpxTool;
pub use nmap::NmapTool;
pub use nuclei::NucleiTool;
pub use sqlmap::SqlmapTool;
pub use subfinder::SubfinderTool;
pub use tlsx::TlsxTool;
pub use wfuzz::WfuzzTool;
pub use wpscan::WpscanTool;
pub use xsstrike::XsstrikeTool;
