// SPDX-License-Identifier: MPL-2.0
use std::fs;
use std::sync::Arc;

use infobars::config::{self, Config, Placement};
use infobars::domain::infobar::{BarIdSource, TabId};
use infobars::i18n::I18n;
use infobars::infobar::headless::{
    settle, CounterpartCall, FixedAccounts, HeadlessHost, HostCall, RecordingCounterpart,
};
use infobars::infobar::{
    drain_events, AttachPosition, BarText, ConfirmBar, ContainerSettings, InfoBarContainer,
    InfoBarEvent, Message, MessageBar, SchedulingContext, TransitionKind, AUTO_LOGIN_FAILED_KEY,
};
use tempfile::tempdir;
use url::Url;

fn url(s: &str) -> Url {
    Url::parse(s).expect("valid url")
}

#[test]
fn settings_file_drives_container_behavior() {
    let dir = tempdir().expect("Failed to create temporary directory");
    fs::write(
        dir.path().join("settings.toml"),
        "[animation]\nduration_ms = 150\nplacement = \"top\"\n\n[auto_login]\nenabled = false\n",
    )
    .expect("Failed to write settings file");

    let (config, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());
    let settings = ContainerSettings::from_config(&config);
    assert_eq!(settings.placement, Placement::Top);
    assert_eq!(settings.duration.millis(), 150);
    assert!(!settings.auto_login_enabled);

    let mut container = InfoBarContainer::new(
        Some(TabId::new(3)),
        HeadlessHost::new(),
        RecordingCounterpart::new(),
    )
    .with_settings(settings)
    .with_accounts(Arc::new(FixedAccounts::signed_in("fred")));

    let remote = container.counterpart_mut().open_handle();
    assert_eq!(
        container.add_auto_login_from_counterpart(remote, "realm=r&args=a"),
        Ok(None)
    );

    container.add_message(MessageBar::info(BarText::literal("first")));
    container.add_message(MessageBar::info(BarText::literal("second")));
    settle(&mut container);

    let transition = container.host().transitions().next().copied().expect("show started");
    assert_eq!(transition.kind, TransitionKind::Show);
    assert!(transition.from_offset < 0);
    assert_eq!(transition.duration.millis(), 150);
    assert!(container.host().calls().iter().all(|call| !matches!(
        call,
        HostCall::Attach {
            position: AttachPosition::Front,
            ..
        }
    )));
}

#[test]
fn localized_host_shows_translated_failure_bar() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let config = Config {
        general: config::GeneralConfig {
            language: Some("fr".to_string()),
        },
        ..Config::default()
    };
    config::save_with_override(&config, Some(dir.path().to_path_buf()))
        .expect("Failed to write settings file");
    let (loaded, _) = config::load_with_override(Some(dir.path().to_path_buf()));

    let i18n = I18n::new(None, &loaded);
    assert_eq!(i18n.current_locale().to_string(), "fr");
    let expected = i18n.tr(AUTO_LOGIN_FAILED_KEY);
    assert!(!expected.starts_with("MISSING"));

    let mut container = InfoBarContainer::new(
        Some(TabId::new(1)),
        HeadlessHost::new().with_i18n(i18n),
        RecordingCounterpart::new(),
    );
    let bar = container
        .add_message(MessageBar::warning(BarText::key(AUTO_LOGIN_FAILED_KEY)))
        .expect("added");
    settle(&mut container);

    assert_eq!(
        container.host().view(bar).map(|view| view.text.as_str()),
        Some(expected.as_str())
    );
}

#[tokio::test]
async fn scheduling_context_runs_a_full_session() {
    let mut context = SchedulingContext::new();
    let mut container = InfoBarContainer::new(
        Some(TabId::new(9)),
        HeadlessHost::new().with_poster(context.poster()),
        RecordingCounterpart::new(),
    )
    .with_url(url("https://www.example.com/"))
    .with_poster(context.poster());
    let mut events = container.subscribe();

    let local = container
        .add_message(MessageBar::info(BarText::literal("Download complete")))
        .expect("added");
    let remote = container.counterpart_mut().open_handle();
    let paired = container
        .add_confirm_from_counterpart(remote, ConfirmBar::new(BarText::literal("Save password?")))
        .expect("added");

    // Host completions arrive as messages on the context.
    while container.is_animating() {
        let message = context.next().await.expect("host completion");
        container.update(message);
    }
    assert_eq!(
        drain_events(&mut events),
        vec![
            InfoBarEvent::added(TabId::new(9), local),
            InfoBarEvent::added(TabId::new(9), paired)
        ]
    );

    let next = context.poster();
    assert!(next.post(Message::PageStarted(url("https://www.example.com/other"))));
    loop {
        context.run_pending(&mut container);
        if !container.is_animating() && context.is_empty() {
            break;
        }
        let message = context.next().await.expect("host completion");
        container.update(message);
    }

    assert_eq!(
        drain_events(&mut events),
        vec![InfoBarEvent::removed(TabId::new(9), local)]
    );
    assert!(container.contains(paired));

    container.counterpart_mut().close_handle(remote);
    container.update(Message::CounterpartClosed(remote));
    while container.is_animating() {
        let message = context.next().await.expect("host completion");
        container.update(message);
    }
    assert!(container.is_empty());
    assert!(container.counterpart().closed().is_empty());

    container.destroy();
    assert_eq!(container.counterpart().double_closes(), 0);
}

#[test]
fn prerender_bars_move_to_the_visible_tab() {
    let ids = Arc::new(BarIdSource::new());
    let mut prerender = InfoBarContainer::new(None, HeadlessHost::new(), RecordingCounterpart::new())
        .with_id_source(Arc::clone(&ids))
        .with_url(url("https://www.example.com/landing"));
    let remote = prerender.counterpart_mut().open_handle();
    let paired = prerender
        .add_confirm_from_counterpart(remote, ConfirmBar::new(BarText::literal("Allow?")))
        .expect("added");
    let local = prerender
        .add_message(MessageBar::info(BarText::literal("Translated")))
        .expect("added");
    let counterpart_calls = prerender.counterpart().calls().len();
    let bars = prerender.hand_off();

    let mut tab = InfoBarContainer::new(Some(TabId::new(2)), HeadlessHost::new(), RecordingCounterpart::new())
        .with_id_source(ids);
    assert_eq!(tab.adopt(url("https://www.example.com/landing#top"), bars), 2);
    settle(&mut tab);

    assert_eq!(counterpart_calls, 0);
    assert_eq!(tab.host().attached_ids(), vec![local, paired]);

    tab.update(Message::ConfirmClicked { bar: paired, accepted: true });
    settle(&mut tab);
    assert_eq!(
        tab.counterpart().calls(),
        &[
            CounterpartCall::Confirmed(remote, true),
            CounterpartCall::Closed(remote)
        ]
    );
}
