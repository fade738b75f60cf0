use clap::{arg, value_parser};
use linkpurpose_core::completion::DEFAULT_MODEL;
use url::Url;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

/// Accepts only absolute URLs but keeps the text as typed, since the report
/// filename is derived from it.
fn parse_target_url(value: &str) -> Result<String, String> {
    Url::parse(value)
        .map(|_| value.to_string())
        .map_err(|e| format!("invalid URL '{}': {}", value, e))
}

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("linkpurpose")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Checks whether the purpose of every link on a page is understandable (WCAG 2.4.4)")
        .bin_name("linkpurpose")
        .styles(CLAP_STYLING)
        .arg(
            arg!(<URL>)
                .help("The page to check")
                .value_parser(parse_target_url),
        )
        .arg(arg!(-q --"quiet" "Suppress banner, progress and the printed report").required(false))
        .arg(arg!(-v --"verbose" "Enable debug logging (overridden by RUST_LOG)").required(false))
        .arg(
            arg!(-o --"output-dir" <PATH>)
                .required(false)
                .help("Directory the report file is written to")
                .default_value("."),
        )
        .arg(
            arg!(--"batch-size" <NUM>)
                .required(false)
                .help("Number of links judged per model request")
                .value_parser(value_parser!(usize))
                .default_value("10"),
        )
        .arg(
            arg!(--"delay-ms" <MILLIS>)
                .required(false)
                .help("Pause between batches in milliseconds")
                .value_parser(value_parser!(u64))
                .default_value("1000"),
        )
        .arg(
            arg!(--"retries" <NUM>)
                .required(false)
                .help("Extra completion attempts for a batch whose response is unusable")
                .value_parser(value_parser!(usize))
                .default_value("0"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Timeout for each model request in seconds")
                .value_parser(value_parser!(u64))
                .default_value("120"),
        )
        .arg(
            arg!(--"model" <MODEL>)
                .required(false)
                .help("Anthropic model used for judging")
                .default_value(DEFAULT_MODEL),
        )
        .arg(
            arg!(--"max-tokens" <NUM>)
                .required(false)
                .help("Maximum tokens in each model response")
                .value_parser(value_parser!(u32))
                .default_value("8192"),
        )
        .arg(
            arg!(--"lang" <LANG>)
                .required(false)
                .help("Language of the prompt and of the judgment reasons")
                .value_parser(["ja", "en"])
                .default_value("ja"),
        )
        .arg(
            arg!(--"webdriver" <URL>)
                .required(false)
                .help("WebDriver endpoint used to render the page")
                .default_value("http://localhost:9515"),
        )
        .arg(
            arg!(--"chrome-binary" <PATH>)
                .required(false)
                .help("Path to the Chrome binary the WebDriver should launch"),
        )
        .arg(
            arg!(--"headful" "Show the browser window while rendering")
                .required(false)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            arg!(--"render-timeout" <SECONDS>)
                .required(false)
                .help("Timeout for rendering the page in seconds")
                .value_parser(value_parser!(u64))
                .default_value("60"),
        )
}
