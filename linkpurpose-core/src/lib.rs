pub mod batch;
pub mod catalog;
pub mod check;
pub mod completion;
pub mod config;
pub mod error;
pub mod judge;
pub mod prompt;
pub mod recovery;
pub mod report;

pub use check::{CheckEvent, CheckOutcome, CheckProgressCallback, LinkChecker};
pub use completion::{AnthropicClient, CompletionConfig, TextCompletion};
pub use config::{CheckerConfig, Language};
pub use error::CheckError;
pub use report::{FinalReport, RunSummary};

use colored::Colorize;

pub fn print_banner() {
    let banner = r#"
  _ _       _                                        
 | (_)_ __ | | ___ __  _   _ _ __ _ __   ___  ___  ___ 
 | | | '_ \| |/ / '_ \| | | | '__| '_ \ / _ \/ __|/ _ \
 | | | | | |   <| |_) | |_| | |  | |_) | (_) \__ \  __/
 |_|_|_| |_|_|\_\ .__/ \__,_|_|  | .__/ \___/|___/\___|
                |_|              |_|                   
"#;
    eprintln!("{}", banner.bright_cyan());
    eprintln!(
        "  {} v{}\n",
        "WCAG 2.4.4 link purpose checker".bright_white().bold(),
        env!("CARGO_PKG_VERSION")
    );
}
