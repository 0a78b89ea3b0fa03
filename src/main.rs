// SPDX-License-Identifier: MPL-2.0
//! `infobars` demo: replays a scenario against the headless host and prints
//! what observers would see.

use std::str::FromStr;
use std::sync::Arc;

use infobars::config::{self, paths};
use infobars::diagnostics::DiagnosticsCollector;
use infobars::domain::infobar::{BarIdSource, TabId};
use infobars::error::{Error, Result};
use infobars::i18n::I18n;
use infobars::infobar::headless::{CounterpartCall, FixedAccounts, HeadlessHost, RecordingCounterpart};
use infobars::infobar::{
    drain_events, BarText, ConfirmBar, ContainerSettings, InfoBarContainer, InfoBarEventKind,
    Message, MessageBar, SchedulingContext,
};
use tracing_subscriber::EnvFilter;
use url::Url;

const USAGE: &str = "\
Usage: infobars [--scenario basic|expiry|auto-login] [--lang LANG]
                [--config-dir DIR] [--duration-ms MS]";

const DEMO_ACCOUNT: &str = "demo@example.com";
const DEMO_AUTO_LOGIN_HEADER: &str = "realm=com.example&account=demo%40example.com&args=continue";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Scenario {
    #[default]
    Basic,
    Expiry,
    AutoLogin,
}

impl FromStr for Scenario {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Scenario::Basic),
            "expiry" => Ok(Scenario::Expiry),
            "auto-login" => Ok(Scenario::AutoLogin),
            other => Err(format!("unknown scenario '{other}'")),
        }
    }
}

impl Scenario {
    fn name(self) -> &'static str {
        match self {
            Scenario::Basic => "basic",
            Scenario::Expiry => "expiry",
            Scenario::AutoLogin => "auto-login",
        }
    }
}

struct Flags {
    scenario: Scenario,
    lang: Option<String>,
    config_dir: Option<String>,
    duration_ms: Option<u64>,
}

fn parse_flags() -> std::result::Result<Option<Flags>, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    if args.contains(["-h", "--help"]) {
        return Ok(None);
    }
    Ok(Some(Flags {
        scenario: args.opt_value_from_str("--scenario")?.unwrap_or_default(),
        lang: args.opt_value_from_str("--lang")?,
        config_dir: args.opt_value_from_str("--config-dir")?,
        duration_ms: args.opt_value_from_str("--duration-ms")?,
    }))
}

type DemoContainer = InfoBarContainer<HeadlessHost, RecordingCounterpart>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let flags = match parse_flags() {
        Ok(Some(flags)) => flags,
        Ok(None) => {
            println!("{USAGE}");
            return Ok(());
        }
        Err(err) => {
            eprintln!("{err}\n{USAGE}");
            return Err(Error::Config(err.to_string()));
        }
    };

    paths::init_cli_override(flags.config_dir.clone());
    let (mut config, warning) = config::load();
    if let Some(duration_ms) = flags.duration_ms {
        config.animation.duration_ms = Some(duration_ms);
    }

    let i18n = I18n::new(flags.lang.clone(), &config);
    if let Some(key) = warning {
        tracing::warn!("{}", i18n.tr(&key));
    }

    let mut diagnostics = DiagnosticsCollector::new(config.diagnostics_capacity());
    let mut context = SchedulingContext::new();
    let ids = Arc::new(BarIdSource::new());
    let accounts = Arc::new(FixedAccounts::signed_in(DEMO_ACCOUNT).with_token("weblogin:continue", "demo-token"));

    let start = demo_url("https://www.example.com/")?;
    let mut container = InfoBarContainer::new(
        Some(TabId::new(1)),
        HeadlessHost::new()
            .with_i18n(i18n)
            .with_poster(context.poster()),
        RecordingCounterpart::new(),
    )
    .with_settings(ContainerSettings::from_config(&config))
    .with_id_source(Arc::clone(&ids))
    .with_url(start)
    .with_accounts(accounts)
    .with_poster(context.poster())
    .with_diagnostics(diagnostics.handle());
    let mut events = container.subscribe();

    match flags.scenario {
        Scenario::Basic => run_basic(&mut container, &mut context).await,
        Scenario::Expiry => run_expiry(&mut container, &mut context).await?,
        Scenario::AutoLogin => run_auto_login(&mut container, &mut context).await?,
    }

    for event in drain_events(&mut events) {
        let kind = match event.kind {
            InfoBarEventKind::Added => "added",
            InfoBarEventKind::Removed => "removed",
        };
        println!("{} {kind} {}", event.tab_id, event.bar_id);
    }
    for call in container.counterpart().calls() {
        println!("counterpart: {call:?}");
    }

    let remaining = container.len().to_string();
    if let Some(i18n) = container.host().i18n() {
        println!(
            "{}",
            i18n.tr_with_args(
                "demo-scenario-done",
                &[("scenario", flags.scenario.name()), ("count", remaining.as_str())],
            )
        );
    }

    container.destroy();
    diagnostics.process_pending();
    tracing::debug!(events = diagnostics.len(), "diagnostics collected");
    if let Ok(report) = diagnostics.export_json() {
        tracing::trace!("{report}");
    }
    Ok(())
}

fn demo_url(url: &str) -> Result<Url> {
    Url::parse(url).map_err(|err| Error::Config(err.to_string()))
}

/// Applies messages until nothing is animating and nothing is queued.
async fn run_until_idle(container: &mut DemoContainer, context: &mut SchedulingContext) {
    while container.is_animating() || !context.is_empty() {
        match context.next().await {
            Some(message) => container.update(message),
            None => break,
        }
    }
}

async fn run_basic(container: &mut DemoContainer, context: &mut SchedulingContext) {
    container.add_message(MessageBar::info(BarText::literal("Download complete")));
    let remote = container.counterpart_mut().open_handle();
    let confirm = container.add_confirm_from_counterpart(
        remote,
        ConfirmBar::new(BarText::literal("Allow this site to show notifications?")).with_buttons(
            Some(BarText::key("infobar-confirm-ok")),
            Some(BarText::key("infobar-confirm-cancel")),
        ),
    );
    run_until_idle(container, context).await;

    if let Ok(bar) = confirm {
        container.update(Message::ConfirmClicked { bar, accepted: true });
        run_until_idle(container, context).await;
    }
}

async fn run_expiry(container: &mut DemoContainer, context: &mut SchedulingContext) -> Result<()> {
    container.add_message(MessageBar::info(BarText::literal("Page translated")));
    container.add_message(MessageBar::warning(BarText::literal("Insecure form")));
    let remote = container.counterpart_mut().open_handle();
    container.add_confirm_from_counterpart(remote, ConfirmBar::new(BarText::literal("Save password?")))?;
    run_until_idle(container, context).await;

    container.update(Message::PageStarted(demo_url("https://www.example.com/next")?));
    run_until_idle(container, context).await;

    // The counterpart expires its own bar.
    if container.counterpart_mut().close_handle(remote) {
        container.update(Message::CounterpartClosed(remote));
    }
    run_until_idle(container, context).await;
    Ok(())
}

async fn run_auto_login(container: &mut DemoContainer, context: &mut SchedulingContext) -> Result<()> {
    let remote = container.counterpart_mut().open_handle();
    let Some(bar) = container.add_auto_login_from_counterpart(remote, DEMO_AUTO_LOGIN_HEADER)? else {
        tracing::info!("no auto-login bar offered");
        return Ok(());
    };
    run_until_idle(container, context).await;

    if container.on_auto_login_accepted(bar) {
        // The credential lookup answers from a worker thread.
        if let Some(message) = context.next().await {
            container.update(message);
        }
    }
    run_until_idle(container, context).await;

    let resolved = container
        .counterpart()
        .calls()
        .iter()
        .any(|call| matches!(call, CounterpartCall::AutoLoginResult(..)));
    tracing::info!(resolved, "auto-login finished");
    Ok(())
}
