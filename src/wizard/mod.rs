//! The two-step launch wizard.
//!
//! [`Wizard`] owns the accumulated [`Configuration`] and a tagged
//! [`WizardState`]. Each step edits a draft; only a successful transition
//! merges the draft back. Collaborators come in through [`WizardContext`].

pub mod context;

use crate::ancillary::{decode, encode_fields, split, CustomProperties, CustomProperty};
use crate::form::{Configuration, FieldValue};
use crate::launch::{LaunchMode, LaunchNotice, LaunchRequest};
use crate::link::{from_link, to_link, LinkError};
use crate::schema::{
    applicable_fields, field_options, fields_for, is_applicable, FieldDefinition, FieldKey,
    WizardStep, ANCILLARY_DATA_KEY,
};
use crate::shared::WizardError;
use crate::validation::{check_kpi_price_identifier, validate_step, FieldErrors};

pub use context::{
    Clipboard, Clock, FixedClock, MemoryClipboard, NetworkIdentity, StaticNetwork, SystemClock,
    WizardContext,
};

const EMPTY_ANCILLARY_RECORD: &str = "{}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardAction {
    Input,
    Next,
    Back,
    CopyLink,
    Submit,
    AddCustomProperty,
    EditCustomProperty,
    RemoveCustomProperty,
    Edit,
}

impl WizardAction {
    pub fn as_str(self) -> &'static str {
        match self {
            WizardAction::Input => "input",
            WizardAction::Next => "next",
            WizardAction::Back => "back",
            WizardAction::CopyLink => "copy_link",
            WizardAction::Submit => "submit",
            WizardAction::AddCustomProperty => "add_custom_property",
            WizardAction::EditCustomProperty => "edit_custom_property",
            WizardAction::RemoveCustomProperty => "remove_custom_property",
            WizardAction::Edit => "edit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WizardState {
    Step1 {
        draft: Configuration,
    },
    Step2 {
        draft: Configuration,
        custom: CustomProperties,
    },
    /// Dry run succeeded; the configuration is kept for further edits.
    Simulated {
        address: String,
    },
    /// Pair created; the working configuration has been reset.
    Deployed {
        address: String,
        submitted: Configuration,
    },
}

impl WizardState {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardState::Step1 { .. } => "step1",
            WizardState::Step2 { .. } => "step2",
            WizardState::Simulated { .. } => "simulated",
            WizardState::Deployed { .. } => "deployed",
        }
    }

    pub fn step(&self) -> Option<WizardStep> {
        match self {
            WizardState::Step1 { .. } => Some(WizardStep::Step1),
            WizardState::Step2 { .. } => Some(WizardStep::Step2),
            WizardState::Simulated { .. } | WizardState::Deployed { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NextOutcome {
    Advanced,
    Rejected(FieldErrors),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Launched {
        mode: LaunchMode,
        address: String,
        notice: LaunchNotice,
    },
    Rejected(FieldErrors),
    /// Another submission holds the busy flag; nothing was dispatched.
    Busy,
    /// The launcher failed; the wizard stays in Step 2.
    Failed {
        notice: LaunchNotice,
    },
}

#[derive(Debug)]
pub struct Wizard {
    context: WizardContext,
    configuration: Configuration,
    state: WizardState,
}

impl Wizard {
    pub fn new(context: WizardContext) -> Self {
        Self::with_configuration(context, Configuration::new())
    }

    /// Starts in Step 1 with `configuration` pre-filled.
    pub fn with_configuration(context: WizardContext, configuration: Configuration) -> Self {
        let draft = configuration.restricted_to(WizardStep::Step1);
        Self {
            context,
            configuration,
            state: WizardState::Step1 { draft },
        }
    }

    pub fn from_link(context: WizardContext, link: &str) -> Result<Self, LinkError> {
        let configuration = from_link(link)?;
        Ok(Self::with_configuration(context, configuration))
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    pub fn context(&self) -> &WizardContext {
        &self.context
    }

    pub fn draft(&self) -> Option<&Configuration> {
        match &self.state {
            WizardState::Step1 { draft } | WizardState::Step2 { draft, .. } => Some(draft),
            WizardState::Simulated { .. } | WizardState::Deployed { .. } => None,
        }
    }

    pub fn custom_properties(&self) -> Option<&CustomProperties> {
        match &self.state {
            WizardState::Step2 { custom, .. } => Some(custom),
            _ => None,
        }
    }

    /// Fields the current step renders, recomputed from the live answers.
    pub fn applicable_fields(&self) -> Vec<&'static FieldDefinition> {
        match &self.state {
            WizardState::Step1 { draft } => applicable_fields(WizardStep::Step1, draft),
            WizardState::Step2 { .. } => applicable_fields(WizardStep::Step2, &self.configuration),
            WizardState::Simulated { .. } | WizardState::Deployed { .. } => Vec::new(),
        }
    }

    pub fn field_options(&self, key: FieldKey) -> Option<Vec<&'static str>> {
        field_options(key.definition(), self.context.chain_id())
    }

    /// Writes `value` into the current draft. Empty values unset the field.
    pub fn set_field(&mut self, key: FieldKey, value: FieldValue) -> Result<(), WizardError> {
        let step = self.state.step();
        if step.is_some_and(|step| key.step() != step) {
            return Err(WizardError::ForeignField {
                field: key.as_str().to_string(),
            });
        }
        self.draft_mut(WizardAction::Input)?.set(key, value);
        Ok(())
    }

    /// Parses operator text for the field named `name` and stores it.
    pub fn input(&mut self, name: &str, raw: &str) -> Result<(), WizardError> {
        let key = FieldKey::parse(name).map_err(|_| WizardError::UnknownField {
            field: name.to_string(),
        })?;
        if raw.trim().is_empty() {
            return self.set_field(key, FieldValue::text(""));
        }
        let value = FieldValue::parse_input(key.definition().value_type, raw).map_err(|reason| {
            WizardError::InvalidInput {
                field: name.to_string(),
                reason,
            }
        })?;
        self.set_field(key, value)
    }

    pub fn add_custom_property(
        &mut self,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<usize, WizardError> {
        self.custom_mut(WizardAction::AddCustomProperty)?
            .add(CustomProperty::new(label, value))
    }

    pub fn edit_custom_property(
        &mut self,
        index: usize,
        label: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), WizardError> {
        self.custom_mut(WizardAction::EditCustomProperty)?
            .update(index, CustomProperty::new(label, value))
    }

    pub fn remove_custom_property(&mut self, index: usize) -> Result<CustomProperty, WizardError> {
        self.custom_mut(WizardAction::RemoveCustomProperty)?
            .remove(index)
    }

    /// Step 1 to Step 2. Validation failures leave both the state and the
    /// configuration untouched.
    pub fn next(&mut self) -> Result<NextOutcome, WizardError> {
        let WizardState::Step1 { draft } = &self.state else {
            return Err(self.invalid(WizardAction::Next));
        };

        let rules = self.context.rule_context();
        let mut errors = validate_step(WizardStep::Step1, draft, draft, &rules);
        if let Err(error) = check_kpi_price_identifier(draft) {
            errors.push(error);
        }
        if !errors.is_empty() {
            self.context.log(
                "warn",
                "wizard.next",
                &format!("step1 rejected with {} field error(s)", errors.len()),
            );
            return Ok(NextOutcome::Rejected(errors));
        }

        let draft = draft.clone();
        let was_kpi = self.configuration.is_kpi_variant();
        self.configuration.merge_step(WizardStep::Step1, &draft);
        if was_kpi
            && !self.configuration.is_kpi_variant()
            && self.configuration.clear_ancillary_data()
        {
            self.context.log(
                "info",
                "wizard.ancillary_cleared",
                "payout library is no longer a KPI option; encoded ancillary data cleared",
            );
        }

        let (draft, custom) = self.step2_entry();
        self.state = WizardState::Step2 { draft, custom };
        self.context.log("info", "wizard.next", "entered step2");
        Ok(NextOutcome::Advanced)
    }

    /// Step 2 to Step 1, discarding the Step 2 draft.
    pub fn back(&mut self) -> Result<(), WizardError> {
        if !matches!(self.state, WizardState::Step2 { .. }) {
            return Err(self.invalid(WizardAction::Back));
        }
        self.state = WizardState::Step1 {
            draft: self.configuration.restricted_to(WizardStep::Step1),
        };
        self.context
            .log("info", "wizard.back", "returned to step1; step2 draft discarded");
        Ok(())
    }

    /// Configuration plus the current (unvalidated) draft.
    pub fn snapshot(&self) -> Result<Configuration, WizardError> {
        match &self.state {
            WizardState::Step1 { draft } => {
                let mut snapshot = self.configuration.clone();
                snapshot.merge_step(WizardStep::Step1, draft);
                Ok(snapshot)
            }
            WizardState::Step2 { draft, custom } => Ok(self.merged_with_step2(draft, custom)),
            _ => Err(self.invalid(WizardAction::CopyLink)),
        }
    }

    /// Serializes the snapshot into a share link and puts it on the
    /// clipboard. The wizard state does not change.
    pub fn copy_link(&self) -> Result<String, WizardError> {
        let snapshot = self.snapshot()?;
        let link = to_link(&self.context.share_base_url, &snapshot);
        self.context.clipboard.copy(&link);
        self.context.log(
            "info",
            "wizard.copy_link",
            &format!("copied share link with {} field(s)", snapshot.len()),
        );
        Ok(link)
    }

    pub fn submit(&mut self, mode: LaunchMode) -> Result<SubmitOutcome, WizardError> {
        let (draft, custom) = match &self.state {
            WizardState::Step2 { draft, custom } => (draft, custom),
            _ => return Err(self.invalid(WizardAction::Submit)),
        };

        let rules = self.context.rule_context();
        let mut errors = validate_step(WizardStep::Step2, &self.configuration, draft, &rules);
        let step1 = validate_step(
            WizardStep::Step1,
            &self.configuration,
            &self.configuration,
            &rules,
        );
        for error in step1.iter() {
            errors.push(error.clone());
        }
        if let Err(error) = check_kpi_price_identifier(&self.configuration) {
            errors.push(error);
        }
        if !errors.is_empty() {
            self.context.log(
                "warn",
                "wizard.submit",
                &format!("{mode} rejected with {} field error(s)", errors.len()),
            );
            return Ok(SubmitOutcome::Rejected(errors));
        }

        let configuration = self.merged_with_step2(draft, custom);
        let Some(_guard) = self.context.busy.try_acquire() else {
            self.context.log(
                "warn",
                "wizard.submit",
                &format!("{mode} refused: a submission is already in progress"),
            );
            return Ok(SubmitOutcome::Busy);
        };

        let request = LaunchRequest {
            mode,
            configuration,
        };
        self.context.log(
            "info",
            "wizard.submit",
            &format!(
                "dispatching {mode} for pair `{}`",
                request
                    .configuration
                    .text(FieldKey::PairName)
                    .unwrap_or_default()
            ),
        );

        match self.context.launcher.launch(&request) {
            Ok(address) => {
                self.context.log(
                    "info",
                    "wizard.submit",
                    &format!("{mode} succeeded: {address}"),
                );
                let notice = LaunchNotice::success(&address);
                self.state = match mode {
                    LaunchMode::Simulate => {
                        self.configuration = request.configuration;
                        WizardState::Simulated {
                            address: address.clone(),
                        }
                    }
                    LaunchMode::Deploy => {
                        self.configuration = Configuration::new();
                        WizardState::Deployed {
                            address: address.clone(),
                            submitted: request.configuration,
                        }
                    }
                };
                Ok(SubmitOutcome::Launched {
                    mode,
                    address,
                    notice,
                })
            }
            Err(error) => {
                self.context.log(
                    "error",
                    "wizard.launch_failed",
                    &format!("{mode} failed: {error}"),
                );
                Ok(SubmitOutcome::Failed {
                    notice: LaunchNotice::failure(&error),
                })
            }
        }
    }

    /// Leaves a submission outcome: a simulated configuration reopens at
    /// Step 2, a deployed one starts over at Step 1.
    pub fn edit(&mut self) -> Result<(), WizardError> {
        match self.state {
            WizardState::Simulated { .. } => {
                let (draft, custom) = self.step2_entry();
                self.state = WizardState::Step2 { draft, custom };
                Ok(())
            }
            WizardState::Deployed { .. } => {
                self.state = WizardState::Step1 {
                    draft: self.configuration.restricted_to(WizardStep::Step1),
                };
                Ok(())
            }
            _ => Err(self.invalid(WizardAction::Edit)),
        }
    }

    /// Abandons the wizard.
    pub fn reset(&mut self) {
        self.configuration = Configuration::new();
        self.state = WizardState::Step1 {
            draft: Configuration::new(),
        };
    }

    fn invalid(&self, action: WizardAction) -> WizardError {
        WizardError::InvalidTransition {
            state: self.state.as_str(),
            action: action.as_str(),
        }
    }

    fn draft_mut(&mut self, action: WizardAction) -> Result<&mut Configuration, WizardError> {
        let state = self.state.as_str();
        match &mut self.state {
            WizardState::Step1 { draft } | WizardState::Step2 { draft, .. } => Ok(draft),
            _ => Err(WizardError::InvalidTransition {
                state,
                action: action.as_str(),
            }),
        }
    }

    fn custom_mut(&mut self, action: WizardAction) -> Result<&mut CustomProperties, WizardError> {
        let state = self.state.as_str();
        let kpi = self.configuration.is_kpi_variant();
        match &mut self.state {
            WizardState::Step2 { custom, .. } if kpi => Ok(custom),
            WizardState::Step2 { .. } => Err(WizardError::CustomPropertiesUnavailable),
            _ => Err(WizardError::InvalidTransition {
                state,
                action: action.as_str(),
            }),
        }
    }

    /// Step 2 draft rebuilt from the configuration. For KPI libraries the
    /// stored ancillary value is decoded back into the named fields, taking
    /// precedence over the plain answers, and the custom list.
    fn step2_entry(&self) -> (Configuration, CustomProperties) {
        let mut draft = self.configuration.restricted_to(WizardStep::Step2);
        if !self.configuration.is_kpi_variant() {
            return (draft, CustomProperties::new());
        }
        draft.remove(ANCILLARY_DATA_KEY);

        let Some(raw) = self.configuration.ancillary_data() else {
            return (draft, CustomProperties::new());
        };
        let record = match decode(raw) {
            Ok(record) => record,
            Err(err) => {
                self.context.log(
                    "warn",
                    "wizard.next",
                    &format!("stored ancillary data ignored: {err}"),
                );
                return (draft, CustomProperties::new());
            }
        };

        // The record wins over the named answers: a custom label may shadow one.
        let parts = split(&record);
        for (key, value) in parts.named.iter() {
            draft.set(key, value.clone());
        }
        if !parts.dropped.is_empty() {
            let labels: Vec<&str> = parts.dropped.iter().map(|p| p.label.as_str()).collect();
            self.context.log(
                "warn",
                "wizard.next",
                &format!("custom properties over the limit dropped: {}", labels.join(", ")),
            );
        }
        (draft, parts.custom)
    }

    fn merged_with_step2(
        &self,
        draft: &Configuration,
        custom: &CustomProperties,
    ) -> Configuration {
        let mut merged = self.configuration.clone();
        merged.merge_step(WizardStep::Step2, draft);
        retain_applicable(&mut merged);
        match ancillary_value(&merged, draft, custom) {
            Some(value) => merged.set(ANCILLARY_DATA_KEY, FieldValue::text(value)),
            None => {
                merged.clear_ancillary_data();
            }
        }
        merged
    }
}

/// Drops Step 2 answers the current payout library does not use.
fn retain_applicable(configuration: &mut Configuration) {
    let stale: Vec<FieldKey> = fields_for(WizardStep::Step2)
        .iter()
        .map(|field| field.key)
        .filter(|key| *key != ANCILLARY_DATA_KEY && !is_applicable(*key, &*configuration))
        .collect();
    for key in stale {
        configuration.remove(key);
    }
}

/// Value stored under the reserved ancillary key: the encoded record for
/// KPI libraries, the free-text field otherwise.
fn ancillary_value(
    merged: &Configuration,
    draft: &Configuration,
    custom: &CustomProperties,
) -> Option<String> {
    if merged.is_kpi_variant() {
        let encoded = encode_fields(true, draft, custom);
        return (encoded != EMPTY_ANCILLARY_RECORD).then_some(encoded);
    }
    draft
        .text(ANCILLARY_DATA_KEY)
        .filter(|raw| !raw.trim().is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launch::{Launcher, NoticeVariant, LAUNCH_FAILED_MESSAGE};
    use crate::shared::{BusyFlag, LaunchError};
    use crate::validation::{INVALID_DATE_MESSAGE, KPI_PRICE_IDENTIFIER_MESSAGE, REQUIRED_MESSAGE};
    use chrono::{TimeZone, Utc};
    use std::sync::{mpsc, Arc, Mutex};

    struct RecordingLauncher {
        failure: Option<String>,
        requests: Mutex<Vec<LaunchRequest>>,
    }

    impl RecordingLauncher {
        fn succeeding() -> Arc<Self> {
            Arc::new(Self {
                failure: None,
                requests: Mutex::new(Vec::new()),
            })
        }

        fn failing(reason: &str) -> Arc<Self> {
            Arc::new(Self {
                failure: Some(reason.to_string()),
                requests: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<LaunchRequest> {
            self.requests.lock().expect("requests lock").clone()
        }
    }

    impl Launcher for RecordingLauncher {
        fn launch(&self, request: &LaunchRequest) -> Result<String, LaunchError> {
            self.requests
                .lock()
                .expect("requests lock")
                .push(request.clone());
            match &self.failure {
                Some(reason) => Err(LaunchError::Rejected {
                    reason: reason.clone(),
                }),
                None => Ok("0xabc".to_string()),
            }
        }
    }

    /// Blocks inside `launch` until the test releases it.
    struct GatedLauncher {
        entered: Mutex<mpsc::Sender<()>>,
        release: Mutex<mpsc::Receiver<()>>,
    }

    impl Launcher for GatedLauncher {
        fn launch(&self, _request: &LaunchRequest) -> Result<String, LaunchError> {
            let _ = self.entered.lock().expect("entered lock").send(());
            let _ = self.release.lock().expect("release lock").recv();
            Ok("0xgated".to_string())
        }
    }

    fn context(launcher: Arc<dyn Launcher>) -> WizardContext {
        WizardContext::new(launcher)
            .with_network(Arc::new(StaticNetwork(Some(1))))
            .with_clock(Arc::new(FixedClock(
                Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0)
                    .single()
                    .expect("date"),
            )))
    }

    fn fill_step1(wizard: &mut Wizard, library: &str, identifier: &str) {
        for (name, raw) in [
            ("pairName", "ETH range"),
            ("expirationTimestamp", "2026-12-31T00:00:00Z"),
            ("collateralPerPair", "1"),
            ("priceIdentifier", identifier),
            ("longSynthName", "ETH range long"),
            ("longSynthSymbol", "ETHl"),
            ("shortSynthName", "ETH range short"),
            ("shortSynthSymbol", "ETHs"),
            ("collateralToken", "WETH"),
            ("fpl", library),
        ] {
            wizard.input(name, raw).expect("step1 input");
        }
    }

    fn fill_kpi_step2(wizard: &mut Wizard) {
        for (name, raw) in [
            ("lowerBound", "0"),
            ("upperBound", "10"),
            ("Metric", "m"),
            ("Endpoint", "e"),
            ("Method", "mt"),
            ("Key", "k"),
            ("Interval", "i"),
            ("gasPrice", "50"),
        ] {
            wizard.input(name, raw).expect("step2 input");
        }
    }

    fn kpi_wizard_in_step2(launcher: Arc<dyn Launcher>) -> Wizard {
        let mut wizard = Wizard::new(context(launcher));
        fill_step1(&mut wizard, "KPI Option - Linear", "General_KPI");
        assert_eq!(wizard.next(), Ok(NextOutcome::Advanced));
        fill_kpi_step2(&mut wizard);
        wizard
    }

    #[test]
    fn next_blocks_on_missing_required_fields() {
        let mut wizard = Wizard::new(context(RecordingLauncher::succeeding()));
        wizard.input("pairName", "ETH range").expect("input");

        let NextOutcome::Rejected(errors) = wizard.next().expect("next") else {
            panic!("expected rejection");
        };
        assert_eq!(errors.get(FieldKey::Fpl), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get(FieldKey::PairName), None);
        assert_eq!(errors.get(FieldKey::ProposerReward), None);
        assert_eq!(wizard.state().as_str(), "step1");
        assert!(wizard.configuration().is_empty());
    }

    #[test]
    fn expiration_must_fall_after_today() {
        let mut wizard = Wizard::new(context(RecordingLauncher::succeeding()));
        fill_step1(&mut wizard, "Linear", "ETHUSD");
        wizard
            .input("expirationTimestamp", "2026-10-16T23:00:00Z")
            .expect("input");

        let NextOutcome::Rejected(errors) = wizard.next().expect("next") else {
            panic!("expected rejection");
        };
        assert_eq!(
            errors.get(FieldKey::ExpirationTimestamp),
            Some(INVALID_DATE_MESSAGE)
        );
    }

    #[test]
    fn kpi_library_requires_sentinel_price_identifier() {
        let mut wizard = Wizard::new(context(RecordingLauncher::succeeding()));
        fill_step1(&mut wizard, "KPI Option - Binary", "ETHUSD");

        let NextOutcome::Rejected(errors) = wizard.next().expect("next") else {
            panic!("expected rejection");
        };
        assert_eq!(errors.fields(), vec![FieldKey::PriceIdentifier]);
        assert_eq!(
            errors.get(FieldKey::PriceIdentifier),
            Some(KPI_PRICE_IDENTIFIER_MESSAGE)
        );
        assert!(wizard.configuration().is_empty());

        wizard.input("priceIdentifier", "General_KPI").expect("input");
        assert_eq!(wizard.next(), Ok(NextOutcome::Advanced));
        assert_eq!(wizard.state().as_str(), "step2");
    }

    #[test]
    fn upper_bound_is_not_required_or_submitted_outside_range_libraries() {
        let launcher = RecordingLauncher::succeeding();
        let mut wizard = Wizard::new(context(launcher.clone()));
        fill_step1(&mut wizard, "BinaryOption", "ETHUSD");
        assert_eq!(wizard.next(), Ok(NextOutcome::Advanced));

        let keys: Vec<FieldKey> = wizard.applicable_fields().iter().map(|f| f.key).collect();
        assert!(!keys.contains(&FieldKey::UpperBound));

        wizard.input("lowerBound", "1").expect("input");
        wizard.input("upperBound", "9").expect("input");
        wizard.input("gasPrice", "40").expect("input");

        let outcome = wizard.submit(LaunchMode::Simulate).expect("submit");
        assert!(matches!(outcome, SubmitOutcome::Launched { .. }));
        let requests = launcher.requests();
        assert_eq!(requests.len(), 1);
        assert!(!requests[0].configuration.is_set(FieldKey::UpperBound));
        assert!(requests[0].configuration.is_set(FieldKey::LowerBound));
    }

    #[test]
    fn submit_blocks_on_missing_applicable_step2_fields() {
        let launcher = RecordingLauncher::succeeding();
        let mut wizard = Wizard::new(context(launcher.clone()));
        fill_step1(&mut wizard, "KPI Option - Linear", "General_KPI");
        wizard.next().expect("next");
        wizard.input("lowerBound", "0").expect("input");

        let SubmitOutcome::Rejected(errors) = wizard.submit(LaunchMode::Deploy).expect("submit")
        else {
            panic!("expected rejection");
        };
        assert_eq!(errors.get(FieldKey::UpperBound), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get(FieldKey::Metric), Some(REQUIRED_MESSAGE));
        assert_eq!(errors.get(FieldKey::CustomAncillaryData), None);
        assert!(launcher.requests().is_empty());
        assert_eq!(wizard.state().as_str(), "step2");
    }

    #[test]
    fn back_discards_the_step2_draft() {
        let mut wizard = kpi_wizard_in_step2(RecordingLauncher::succeeding());
        wizard.add_custom_property("x", "y").expect("add");

        wizard.back().expect("back");
        assert!(!wizard.configuration().is_set(FieldKey::Metric));
        assert_eq!(wizard.draft().and_then(|d| d.text(FieldKey::PairName)), Some("ETH range"));

        wizard.next().expect("next");
        assert_eq!(wizard.draft().and_then(|d| d.text(FieldKey::Metric)), None);
        assert_eq!(wizard.custom_properties().map(CustomProperties::len), Some(0));
    }

    #[test]
    fn submit_encodes_ancillary_record_into_the_reserved_key() {
        let launcher = RecordingLauncher::succeeding();
        let mut wizard = kpi_wizard_in_step2(launcher.clone());
        wizard.add_custom_property("x", "y").expect("add");

        let outcome = wizard.submit(LaunchMode::Simulate).expect("submit");
        let SubmitOutcome::Launched { address, notice, .. } = outcome else {
            panic!("expected launch");
        };
        assert_eq!(address, "0xabc");
        assert_eq!(notice.message, "LSP address: 0xabc");

        let request = &launcher.requests()[0];
        assert_eq!(request.mode, LaunchMode::Simulate);
        let record = decode(request.configuration.ancillary_data().expect("ancillary"))
            .expect("decode");
        assert_eq!(
            record.keys(),
            vec!["Metric", "Endpoint", "Method", "Key", "Interval", "x"]
        );
        assert_eq!(record.get("x"), Some("y"));
    }

    #[test]
    fn switching_away_from_kpi_clears_encoded_ancillary_value() {
        let mut wizard = kpi_wizard_in_step2(RecordingLauncher::succeeding());
        wizard.submit(LaunchMode::Simulate).expect("submit");
        assert!(wizard.configuration().ancillary_data().is_some());

        wizard.edit().expect("edit");
        wizard.back().expect("back");
        wizard.input("fpl", "Linear").expect("input");
        wizard.input("priceIdentifier", "ETHUSD").expect("input");
        assert_eq!(wizard.next(), Ok(NextOutcome::Advanced));

        assert_eq!(wizard.configuration().ancillary_data(), None);
    }

    #[test]
    fn staying_on_a_kpi_library_keeps_the_encoded_value() {
        let mut wizard = kpi_wizard_in_step2(RecordingLauncher::succeeding());
        wizard.submit(LaunchMode::Simulate).expect("submit");
        wizard.edit().expect("edit");
        wizard.back().expect("back");
        wizard.input("fpl", "KPI Option - Binary").expect("input");
        wizard.next().expect("next");

        assert!(wizard.configuration().ancillary_data().is_some());
    }

    #[test]
    fn custom_properties_cap_at_five_and_shift_on_remove() {
        let mut wizard = kpi_wizard_in_step2(RecordingLauncher::succeeding());
        for idx in 0..5 {
            assert_eq!(
                wizard.add_custom_property(format!("label{idx}"), "v"),
                Ok(idx)
            );
        }
        assert_eq!(
            wizard.add_custom_property("label5", "v"),
            Err(WizardError::CustomPropertyLimit { limit: 5 })
        );

        let removed = wizard.remove_custom_property(1).expect("remove");
        assert_eq!(removed.label, "label1");
        let labels: Vec<String> = wizard
            .custom_properties()
            .expect("custom")
            .iter()
            .map(|p| p.label.clone())
            .collect();
        assert_eq!(labels, vec!["label0", "label2", "label3", "label4"]);

        wizard.edit_custom_property(0, "first", "1").expect("edit");
        assert_eq!(
            wizard.custom_properties().and_then(|c| c.get(0)).map(|p| p.label.as_str()),
            Some("first")
        );
    }

    #[test]
    fn custom_properties_need_a_kpi_library_in_step2() {
        let mut wizard = Wizard::new(context(RecordingLauncher::succeeding()));
        assert_eq!(
            wizard.add_custom_property("x", "y"),
            Err(WizardError::InvalidTransition {
                state: "step1",
                action: "add_custom_property",
            })
        );

        fill_step1(&mut wizard, "Linear", "ETHUSD");
        wizard.next().expect("next");
        assert_eq!(
            wizard.add_custom_property("x", "y"),
            Err(WizardError::CustomPropertiesUnavailable)
        );
    }

    #[test]
    fn non_kpi_free_text_is_stored_verbatim() {
        let launcher = RecordingLauncher::succeeding();
        let mut wizard = Wizard::new(context(launcher.clone()));
        fill_step1(&mut wizard, "Linear", "ETHUSD");
        wizard.next().expect("next");
        for (name, raw) in [
            ("lowerBound", "1"),
            ("upperBound", "2"),
            ("customAncillaryData", "q:ETH price"),
            ("gasPrice", "30"),
        ] {
            wizard.input(name, raw).expect("input");
        }

        wizard.submit(LaunchMode::Deploy).expect("submit");
        let request = &launcher.requests()[0];
        assert_eq!(request.configuration.ancillary_data(), Some("q:ETH price"));
        assert!(!request.configuration.is_set(FieldKey::Metric));
    }

    #[test]
    fn launch_failure_keeps_step2_and_releases_the_busy_flag() {
        let launcher = RecordingLauncher::failing("insufficient funds");
        let mut wizard = kpi_wizard_in_step2(launcher.clone());

        let outcome = wizard.submit(LaunchMode::Deploy).expect("submit");
        let SubmitOutcome::Failed { notice } = outcome else {
            panic!("expected failure");
        };
        assert_eq!(notice.variant, NoticeVariant::Error);
        assert_eq!(notice.message, LAUNCH_FAILED_MESSAGE);
        assert_eq!(notice.details.as_deref(), Some("insufficient funds"));

        assert_eq!(wizard.state().as_str(), "step2");
        assert_eq!(wizard.draft().and_then(|d| d.text(FieldKey::Metric)), Some("m"));
        assert!(!wizard.context().busy.is_busy());
        assert!(!wizard.configuration().is_set(FieldKey::Metric));

        let retry = wizard.submit(LaunchMode::Deploy).expect("retry");
        assert!(matches!(retry, SubmitOutcome::Failed { .. }));
        assert_eq!(launcher.requests().len(), 2);
    }

    #[test]
    fn submit_is_refused_while_the_busy_flag_is_held() {
        let launcher = RecordingLauncher::succeeding();
        let mut wizard = kpi_wizard_in_step2(launcher.clone());

        let guard = wizard.context().busy.try_acquire().expect("acquire");
        assert_eq!(wizard.submit(LaunchMode::Simulate), Ok(SubmitOutcome::Busy));
        assert!(launcher.requests().is_empty());
        assert_eq!(wizard.state().as_str(), "step2");

        drop(guard);
        let outcome = wizard.submit(LaunchMode::Simulate).expect("submit");
        assert!(matches!(outcome, SubmitOutcome::Launched { .. }));
    }

    #[test]
    fn concurrent_submissions_share_one_busy_flag() {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let gated: Arc<dyn Launcher> = Arc::new(GatedLauncher {
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        });
        let busy = BusyFlag::new();

        let mut first = kpi_wizard_in_step2(gated.clone());
        first.context = first.context.clone().with_busy_flag(busy.clone());
        let mut second = kpi_wizard_in_step2(gated);
        second.context = second.context.clone().with_busy_flag(busy.clone());

        let handle = std::thread::spawn(move || first.submit(LaunchMode::Deploy));
        entered_rx.recv().expect("first launch entered");

        assert!(busy.is_busy());
        assert_eq!(second.submit(LaunchMode::Deploy), Ok(SubmitOutcome::Busy));

        release_tx.send(()).expect("release first");
        let first_outcome = handle.join().expect("join").expect("submit");
        assert!(matches!(first_outcome, SubmitOutcome::Launched { .. }));
        assert!(!busy.is_busy());

        release_tx.send(()).expect("release second");
        let second_outcome = second.submit(LaunchMode::Deploy).expect("submit");
        assert!(matches!(second_outcome, SubmitOutcome::Launched { .. }));
    }

    #[test]
    fn copy_link_round_trips_through_a_new_wizard() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let launcher = RecordingLauncher::succeeding();
        let mut wizard = Wizard::new(context(launcher.clone()).with_clipboard(clipboard.clone()));
        fill_step1(&mut wizard, "KPI Option - Linear", "General_KPI");
        wizard.next().expect("next");
        fill_kpi_step2(&mut wizard);
        wizard.add_custom_property("x", "y").expect("add");

        let link = wizard.copy_link().expect("copy");
        assert_eq!(clipboard.contents().as_deref(), Some(link.as_str()));
        assert_eq!(wizard.state().as_str(), "step2");
        assert!(!wizard.configuration().is_set(FieldKey::Metric));

        let snapshot = wizard.snapshot().expect("snapshot");
        let mut restored = Wizard::from_link(context(launcher), &link).expect("from link");
        assert_eq!(restored.configuration(), &snapshot);

        assert_eq!(restored.next(), Ok(NextOutcome::Advanced));
        assert_eq!(restored.draft().and_then(|d| d.text(FieldKey::Interval)), Some("i"));
        let custom = restored.custom_properties().expect("custom");
        assert_eq!(custom.as_slice(), &[CustomProperty::new("x", "y")]);
    }

    #[test]
    fn custom_label_shadowing_a_named_key_survives_edit_and_links() {
        let launcher = RecordingLauncher::succeeding();
        let mut wizard = kpi_wizard_in_step2(launcher.clone());
        wizard.add_custom_property("Metric", "override").expect("add");
        let link = wizard.copy_link().expect("copy");

        assert!(matches!(
            wizard.submit(LaunchMode::Simulate),
            Ok(SubmitOutcome::Launched { .. })
        ));
        wizard.edit().expect("edit");
        assert_eq!(
            wizard.draft().and_then(|d| d.text(FieldKey::Metric)),
            Some("override")
        );
        assert!(matches!(
            wizard.submit(LaunchMode::Deploy),
            Ok(SubmitOutcome::Launched { .. })
        ));

        let requests = launcher.requests();
        let simulated = requests[0].configuration.ancillary_data().expect("simulated");
        let deployed = requests[1].configuration.ancillary_data().expect("deployed");
        assert_eq!(decode(simulated).expect("decode"), decode(deployed).expect("decode"));
        assert_eq!(
            decode(deployed).expect("decode").get("Metric"),
            Some("override")
        );

        let mut restored = Wizard::from_link(context(launcher), &link).expect("from link");
        assert_eq!(restored.next(), Ok(NextOutcome::Advanced));
        assert_eq!(
            restored.draft().and_then(|d| d.text(FieldKey::Metric)),
            Some("override")
        );
    }

    #[test]
    fn copy_link_in_step1_uses_the_unvalidated_draft() {
        let clipboard = Arc::new(MemoryClipboard::new());
        let mut wizard =
            Wizard::new(context(RecordingLauncher::succeeding()).with_clipboard(clipboard));
        wizard.input("pairName", "half done").expect("input");
        wizard.input("enableEarlyExpiration", "no").expect("input");

        let link = wizard.copy_link().expect("copy");
        assert_eq!(
            link,
            "https://lsp.local/launch?pairName=half%20done&enableEarlyExpiration=false"
        );
    }

    #[test]
    fn stored_custom_properties_past_the_limit_are_dropped() {
        let mut configuration = Configuration::new();
        for (key, raw) in [
            (FieldKey::Fpl, "KPI Option - Binary"),
            (
                FieldKey::CustomAncillaryData,
                r#"{"Metric":"m","a":"1","b":"2","c":"3","d":"4","e":"5","f":"6"}"#,
            ),
        ] {
            configuration.set(key, FieldValue::text(raw));
        }
        let mut wizard =
            Wizard::with_configuration(context(RecordingLauncher::succeeding()), configuration);
        fill_step1(&mut wizard, "KPI Option - Binary", "General_KPI");
        wizard.next().expect("next");

        assert_eq!(wizard.draft().and_then(|d| d.text(FieldKey::Metric)), Some("m"));
        let custom = wizard.custom_properties().expect("custom");
        assert_eq!(custom.len(), 5);
        assert_eq!(custom.get(4).map(|p| p.label.as_str()), Some("e"));
    }

    #[test]
    fn deploy_resets_and_simulate_keeps_the_configuration() {
        let mut simulated = kpi_wizard_in_step2(RecordingLauncher::succeeding());
        simulated.submit(LaunchMode::Simulate).expect("submit");
        assert_eq!(
            simulated.state(),
            &WizardState::Simulated {
                address: "0xabc".to_string()
            }
        );
        simulated.edit().expect("edit");
        assert_eq!(simulated.draft().and_then(|d| d.text(FieldKey::Key)), Some("k"));

        let mut deployed = kpi_wizard_in_step2(RecordingLauncher::succeeding());
        deployed.submit(LaunchMode::Deploy).expect("submit");
        let WizardState::Deployed { submitted, .. } = deployed.state() else {
            panic!("expected deployed");
        };
        assert_eq!(submitted.text(FieldKey::PairName), Some("ETH range"));
        assert!(deployed.configuration().is_empty());

        deployed.edit().expect("edit");
        assert_eq!(deployed.draft(), Some(&Configuration::new()));
    }

    #[test]
    fn input_rejects_foreign_unknown_and_malformed_values() {
        let mut wizard = Wizard::new(context(RecordingLauncher::succeeding()));
        assert_eq!(
            wizard.input("gasPrice", "10"),
            Err(WizardError::ForeignField {
                field: "gasPrice".to_string()
            })
        );
        assert_eq!(
            wizard.input("colour", "red"),
            Err(WizardError::UnknownField {
                field: "colour".to_string()
            })
        );
        assert!(matches!(
            wizard.input("expirationTimestamp", "tomorrow"),
            Err(WizardError::InvalidInput { .. })
        ));
    }

    #[test]
    fn transitions_outside_their_state_are_rejected() {
        let mut wizard = Wizard::new(context(RecordingLauncher::succeeding()));
        assert_eq!(
            wizard.back(),
            Err(WizardError::InvalidTransition {
                state: "step1",
                action: "back",
            })
        );
        assert_eq!(
            wizard.submit(LaunchMode::Simulate),
            Err(WizardError::InvalidTransition {
                state: "step1",
                action: "submit",
            })
        );
        assert!(wizard.edit().is_err());
    }

    #[test]
    fn collateral_options_follow_the_connected_network() {
        let polygon = context(RecordingLauncher::succeeding())
            .with_network(Arc::new(StaticNetwork(Some(137))));
        let wizard = Wizard::new(polygon);
        let options = wizard
            .field_options(FieldKey::CollateralToken)
            .expect("options");
        assert!(options.contains(&"WMATIC"));
        assert!(!options.contains(&"WBTC"));

        let offline = Wizard::new(
            context(RecordingLauncher::succeeding()).with_network(Arc::new(StaticNetwork(None))),
        );
        assert_eq!(offline.field_options(FieldKey::CollateralToken), None);
    }

    #[test]
    fn events_are_logged_when_a_log_path_is_configured() {
        let dir = tempfile::tempdir().expect("tempdir");
        let log = dir.path().join("events.log");
        let mut wizard = Wizard::new(
            context(RecordingLauncher::succeeding()).with_event_log(Some(log.clone())),
        );
        fill_step1(&mut wizard, "Linear", "ETHUSD");
        wizard.next().expect("next");
        wizard.back().expect("back");

        let contents = std::fs::read_to_string(&log).expect("read log");
        assert!(contents.contains("\"event\":\"wizard.next\""));
        assert!(contents.contains("\"event\":\"wizard.back\""));
    }
}
