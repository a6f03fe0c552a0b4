use crate::ancillary::{decode, encode_fields, CustomProperties, CustomProperty};
use crate::app::cli::{help_text, parse_cli_verb, CliVerb};
use crate::config::{load_settings, ConfigError, Settings};
use crate::form::{Configuration, FieldValue};
use crate::launch::{LaunchMode, Launcher, RelayLauncher};
use crate::link::{from_link, to_link, to_query};
use crate::schema::{
    applicable_fields, field_options, FieldGroup, FieldKey, PayoutLibrary, WizardStep,
    ANCILLARY_DATA_KEY,
};
use crate::validation::FieldErrors;
use crate::wizard::{NextOutcome, StaticNetwork, SubmitOutcome, Wizard, WizardContext};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub fn run_cli(args: Vec<String>) -> Result<String, String> {
    if args.is_empty() {
        return Ok(help_text());
    }

    match parse_cli_verb(args[0].as_str()) {
        CliVerb::Fields => cmd_fields(&args[1..]),
        CliVerb::Link => cmd_link(&args[1..]),
        CliVerb::Decode => cmd_decode(&args[1..]),
        CliVerb::Launch => cmd_launch(&args[1..]),
        CliVerb::Help => Ok(help_text()),
        CliVerb::Unknown => Err(format!("unknown command `{}`", args[0])),
    }
}

pub fn map_config_err(err: ConfigError) -> String {
    err.to_string()
}

fn settings() -> Result<Settings, String> {
    load_settings(None).map_err(map_config_err)
}

/// Wires host collaborators from settings.
pub fn build_context(settings: &Settings, launcher: Arc<dyn Launcher>) -> WizardContext {
    WizardContext::new(launcher)
        .with_network(Arc::new(StaticNetwork(settings.chain_id)))
        .with_share_base_url(settings.share_base_url.clone())
        .with_event_log(settings.event_log.clone())
}

pub fn cmd_fields(args: &[String]) -> Result<String, String> {
    let step = args
        .first()
        .ok_or_else(|| "usage: fields <step1|step2> [payout-library]".to_string())
        .and_then(|raw| WizardStep::parse(raw))?;
    let library = if args.len() > 1 {
        Some(PayoutLibrary::parse(&args[1..].join(" "))?)
    } else {
        None
    };
    Ok(render_fields(step, library, settings()?.chain_id))
}

pub fn render_fields(
    step: WizardStep,
    library: Option<PayoutLibrary>,
    chain_id: Option<u64>,
) -> String {
    let mut scope = Configuration::new();
    if let Some(library) = library {
        scope.set(FieldKey::Fpl, FieldValue::text(library.as_str()));
    }

    let mut lines = Vec::new();
    let mut group: Option<FieldGroup> = None;
    for field in applicable_fields(step, &scope) {
        if group != Some(field.group) {
            group = Some(field.group);
            lines.push(format!("[{}]", field.group.title()));
        }
        let presence = if field.rules.required {
            "required"
        } else {
            "optional"
        };
        lines.push(format!(
            "  {0:30} {1:9} {2:8} {3}",
            field.name(),
            field.value_type.as_str(),
            presence,
            field.key.label()
        ));
        if let Some(options) = field_options(field, chain_id) {
            let options: Vec<String> = options.into_iter().map(option_label).collect();
            lines.push(format!("  {0:30} options: {1}", "", options.join(", ")));
        }
    }
    lines.join("\n")
}

/// Payout libraries show their display name next to the value to type.
fn option_label(option: &str) -> String {
    match PayoutLibrary::parse(option) {
        Ok(library) if library.display_name() != option => {
            format!("{option} ({})", library.display_name())
        }
        _ => option.to_string(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnswerFile {
    #[serde(default)]
    pub fields: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub custom: Vec<CustomEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CustomEntry {
    pub label: String,
    #[serde(default)]
    pub value: String,
}

pub fn cmd_link(args: &[String]) -> Result<String, String> {
    let path = args
        .first()
        .ok_or_else(|| "usage: link <answers.yaml>".to_string())?;
    let path = Path::new(path);
    let raw =
        fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
    let answers: AnswerFile = serde_yaml::from_str(&raw)
        .map_err(|e| format!("failed to parse {}: {e}", path.display()))?;
    let configuration = answers_to_configuration(&answers)?;
    Ok(to_link(&settings()?.share_base_url, &configuration))
}

/// Builds a configuration from an answer file. For KPI libraries the named
/// ancillary fields and the custom list are encoded into the reserved key.
pub fn answers_to_configuration(answers: &AnswerFile) -> Result<Configuration, String> {
    let mut configuration = Configuration::new();
    for (name, value) in &answers.fields {
        let key = FieldKey::parse(name)?;
        let raw = scalar_text(name, value)?;
        let parsed = FieldValue::parse_input(key.definition().value_type, &raw)
            .map_err(|e| format!("{name}: {e}"))?;
        configuration.set(key, parsed);
    }

    let mut custom = CustomProperties::new();
    for entry in &answers.custom {
        custom
            .add(CustomProperty::new(entry.label.clone(), entry.value.clone()))
            .map_err(|e| e.to_string())?;
    }

    if configuration.is_kpi_variant() {
        let encoded = encode_fields(true, &configuration, &custom);
        configuration.set(ANCILLARY_DATA_KEY, FieldValue::text(encoded));
    } else if !custom.is_empty() {
        return Err("custom properties need a KPI option payout library".to_string());
    }
    Ok(configuration)
}

fn scalar_text(name: &str, value: &serde_yaml::Value) -> Result<String, String> {
    match value {
        serde_yaml::Value::Null => Ok(String::new()),
        serde_yaml::Value::Bool(flag) => Ok(flag.to_string()),
        serde_yaml::Value::Number(number) => Ok(number.to_string()),
        serde_yaml::Value::String(text) => Ok(text.clone()),
        _ => Err(format!("{name}: expected a scalar value")),
    }
}

pub fn cmd_decode(args: &[String]) -> Result<String, String> {
    let link = args
        .first()
        .ok_or_else(|| "usage: decode <link>".to_string())?;
    let configuration = from_link(link).map_err(|e| e.to_string())?;
    Ok(render_configuration(&configuration))
}

/// `name=value` lines in field order, followed by the decoded ancillary
/// record for KPI libraries.
pub fn render_configuration(configuration: &Configuration) -> String {
    if configuration.is_empty() {
        return "no recognized fields".to_string();
    }
    let mut lines: Vec<String> = to_query(configuration)
        .into_iter()
        .map(|(name, value)| format!("{name}={value}"))
        .collect();

    if configuration.is_kpi_variant() {
        if let Some(raw) = configuration.ancillary_data() {
            match decode(raw) {
                Ok(record) => lines.extend(
                    record
                        .iter()
                        .map(|(key, value)| format!("ancillary.{key}={value}")),
                ),
                Err(err) => lines.push(format!("ancillary.error={err}")),
            }
        }
    }
    lines.join("\n")
}

pub fn cmd_launch(args: &[String]) -> Result<String, String> {
    if args.len() < 2 {
        return Err("usage: launch <link> --simulate|--deploy".to_string());
    }
    let mode = LaunchMode::parse(&args[1])?;
    let settings = settings()?;
    let launcher = Arc::new(RelayLauncher::new(settings.relay.clone()));
    launch_link(build_context(&settings, launcher), &args[0], mode)
}

/// Replays a link through the wizard: Next, then Submit.
pub fn launch_link(context: WizardContext, link: &str, mode: LaunchMode) -> Result<String, String> {
    let mut wizard = Wizard::from_link(context, link).map_err(|e| e.to_string())?;

    match wizard.next().map_err(|e| e.to_string())? {
        NextOutcome::Advanced => {}
        NextOutcome::Rejected(errors) => return Err(render_errors(WizardStep::Step1, &errors)),
    }

    match wizard.submit(mode).map_err(|e| e.to_string())? {
        SubmitOutcome::Launched {
            mode,
            address,
            notice,
        } => Ok(format!("mode={mode}\naddress={address}\nnotice={notice}")),
        SubmitOutcome::Rejected(errors) => Err(render_errors(WizardStep::Step2, &errors)),
        SubmitOutcome::Busy => Err("another submission is already in progress".to_string()),
        SubmitOutcome::Failed { notice } => Err(notice.to_string()),
    }
}

fn render_errors(step: WizardStep, errors: &FieldErrors) -> String {
    format!("{} rejected:\n{errors}", step.as_str())
}
