#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliVerb {
    Fields,
    Link,
    Decode,
    Launch,
    Help,
    Unknown,
}

pub fn parse_cli_verb(input: &str) -> CliVerb {
    match input {
        "fields" => CliVerb::Fields,
        "link" => CliVerb::Link,
        "decode" => CliVerb::Decode,
        "launch" => CliVerb::Launch,
        "help" | "--help" | "-h" => CliVerb::Help,
        _ => CliVerb::Unknown,
    }
}

pub fn cli_help_lines() -> Vec<String> {
    vec![
        "Commands:".to_string(),
        "  fields <step1|step2> [payout-library]  List the fields a step renders".to_string(),
        "  link <answers.yaml>                    Build a share link from a YAML answer file"
            .to_string(),
        "  decode <link>                          Print the configuration a link carries"
            .to_string(),
        "  launch <link> --simulate|--deploy      Validate a link and submit it to the relay"
            .to_string(),
        String::new(),
        "Settings are read from ~/.lsp-launch/settings.yaml when present.".to_string(),
    ]
}

pub(crate) fn help_text() -> String {
    cli_help_lines().join("\n")
}
