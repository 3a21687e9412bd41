mod common;

use common::{BASE_URL, ScriptedTransport, client_with, client_with_options, status, success};
use overlay_sync::client::{
    DeliveryFailure, HttpReply, RetryPolicy, TransientCause, TransportError, UpdateOutcome,
};
use overlay_sync_config::{
    AnimationUpdate, ColorsUpdate, FontUpdate, LayoutUpdate, OverlayUpdate, Section,
    SectionFields, ValidationError,
};
use serde_json::json;
use std::time::Duration;

fn fields(pairs: &[(&str, &str)]) -> SectionFields {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ── Idempotent delivery ──────────────────────────────────────────────────────

#[test]
fn test_identical_font_update_sent_once() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    let first = client
        .update_font(FontUpdate::new().family("Arial").size("64px"))
        .unwrap();
    let second = client
        .update_font(FontUpdate::new().size("64px").family("Arial"))
        .unwrap();

    assert_eq!(first, UpdateOutcome::Delivered);
    assert_eq!(second, UpdateOutcome::AlreadyApplied);
    assert!(second.is_applied());
    assert_eq!(transport.posts().len(), 1);
    assert_eq!(client.cached_fingerprints(), 1);
}

#[test]
fn test_different_values_are_not_deduplicated() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    client.update_font(FontUpdate::new().size("64px")).unwrap();
    client.update_font(FontUpdate::new().size("72px")).unwrap();

    assert_eq!(transport.posts().len(), 2);
}

#[test]
fn test_same_fields_in_other_section_not_deduplicated() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    client
        .update_layout(LayoutUpdate::new().with_extra("x", "1"))
        .unwrap();
    client
        .update_animation(AnimationUpdate::new().with_extra("x", "1"))
        .unwrap();

    assert_eq!(transport.posts().len(), 2);
}

#[test]
fn test_failed_delivery_is_not_cached() {
    let transport = ScriptedTransport::new();
    transport.push_post(status(400));
    let (client, _) = client_with(&transport);

    let first = client.update_colors(ColorsUpdate::new().text("red")).unwrap();
    assert_eq!(first, UpdateOutcome::Failed(DeliveryFailure::ClientStatus(400)));
    assert_eq!(client.cached_fingerprints(), 0);

    let second = client.update_colors(ColorsUpdate::new().text("red")).unwrap();
    assert_eq!(second, UpdateOutcome::Delivered);
    assert_eq!(transport.posts().len(), 2);
}

#[test]
fn test_disabled_cache_always_sends() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with_options(&transport, false, RetryPolicy::default());

    for _ in 0..3 {
        let outcome = client.update_layout(LayoutUpdate::new().gap("4px")).unwrap();
        assert_eq!(outcome, UpdateOutcome::Delivered);
    }
    assert_eq!(transport.posts().len(), 3);
    assert_eq!(client.cached_fingerprints(), 0);
}

// ── Cache invalidation ───────────────────────────────────────────────────────

#[test]
fn test_clear_cache_forces_resend() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    client.update_font(FontUpdate::new().weight("bold")).unwrap();
    client.clear_cache();
    assert_eq!(client.cached_fingerprints(), 0);

    let outcome = client.update_font(FontUpdate::new().weight("bold")).unwrap();
    assert_eq!(outcome, UpdateOutcome::Delivered);
    assert_eq!(transport.posts().len(), 2);
}

#[test]
fn test_clear_cache_drops_full_config() {
    let transport = ScriptedTransport::new();
    transport.push_get(Ok(HttpReply::new(200, r#"{"font": {"size": "64px"}}"#)));
    transport.push_get(Ok(HttpReply::new(200, r#"{"font": {"size": "32px"}}"#)));
    let (client, _) = client_with(&transport);

    let first = client.get_config(true).unwrap();
    client.clear_cache();
    let second = client.get_config(true).unwrap();

    assert_eq!(first.field_str(Section::Font, "size"), Some("64px"));
    assert_eq!(second.field_str(Section::Font, "size"), Some("32px"));
    assert_eq!(transport.request_count(), 2);
}

// ── Validation ───────────────────────────────────────────────────────────────

#[test]
fn test_font_size_boundaries() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    for ok in ["64px", "1.5em", "2rem", "120%", "12pt", "0px"] {
        assert!(
            client.update_font(FontUpdate::new().size(ok)).is_ok(),
            "{ok} should be accepted"
        );
    }
    for bad in ["64", "px", "-1px", "1.px", "64 px", "64PX"] {
        assert_eq!(
            client.update_font(FontUpdate::new().size(bad)),
            Err(ValidationError::FontSize(bad.to_string())),
            "{bad} should be rejected"
        );
    }
    // Only the six valid sizes reached the network.
    assert_eq!(transport.posts().len(), 6);
}

#[test]
fn test_font_weight_validation() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    assert!(client.update_font(FontUpdate::new().weight("700")).is_ok());
    assert!(client.update_font(FontUpdate::new().weight("lighter")).is_ok());
    assert!(matches!(
        client.update_font(FontUpdate::new().weight("750")),
        Err(ValidationError::FontWeight(_))
    ));
    assert!(matches!(
        client.update_font(FontUpdate::new().weight("heavy")),
        Err(ValidationError::FontWeight(_))
    ));
}

#[test]
fn test_color_channel_boundary() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    assert!(
        client
            .update_colors(ColorsUpdate::new().shadow("rgba(255,255,255,0.5)"))
            .is_ok()
    );
    let err = client
        .update_colors(ColorsUpdate::new().shadow("rgba(256,0,0,0.5)"))
        .unwrap_err();
    assert!(matches!(err, ValidationError::Color { ref field, .. } if field == "shadow"));
    assert_eq!(transport.posts().len(), 1);
}

#[test]
fn test_invalid_field_blocks_whole_update() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    let result = client.update_colors(ColorsUpdate::new().text("white").stroke("#12"));
    assert!(result.is_err());
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn test_animation_duration_validated_easing_not() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    assert!(
        client
            .update_animation(AnimationUpdate::new().duration("250ms").easing("anything goes"))
            .is_ok()
    );
    assert!(matches!(
        client.update_animation(AnimationUpdate::new().duration("1 s")),
        Err(ValidationError::Duration(_))
    ));
}

// ── Retry policy ─────────────────────────────────────────────────────────────

#[test]
fn test_5xx_retried_three_times_with_backoff() {
    let transport = ScriptedTransport::new();
    for _ in 0..3 {
        transport.push_post(status(503));
    }
    let (client, sleeps) = client_with(&transport);

    let outcome = client.update_layout(LayoutUpdate::new().gap("2px")).unwrap();

    assert_eq!(
        outcome,
        UpdateOutcome::Failed(DeliveryFailure::RetriesExhausted {
            attempts: 3,
            last: TransientCause::ServerStatus(503),
        })
    );
    assert!(!outcome.is_applied());
    assert_eq!(transport.posts().len(), 3);
    assert_eq!(
        sleeps.delays(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
    assert_eq!(client.cached_fingerprints(), 0);
}

#[test]
fn test_5xx_then_success() {
    let transport = ScriptedTransport::new();
    transport.push_post(status(500));
    transport.push_post(Ok(success()));
    let (client, sleeps) = client_with(&transport);

    let outcome = client.update_layout(LayoutUpdate::new().gap("2px")).unwrap();
    assert_eq!(outcome, UpdateOutcome::Delivered);
    assert_eq!(sleeps.delays(), vec![Duration::from_secs(1)]);
    assert_eq!(client.cached_fingerprints(), 1);
}

#[test]
fn test_4xx_not_retried() {
    let transport = ScriptedTransport::new();
    transport.push_post(status(422));
    let (client, sleeps) = client_with(&transport);

    let result = client.deliver(&OverlayUpdate::single(Section::Font, fields(&[("size", "1px")])));
    assert_eq!(result, Err(DeliveryFailure::ClientStatus(422)));
    assert_eq!(transport.posts().len(), 1);
    assert!(sleeps.delays().is_empty());
}

#[test]
fn test_logical_failure_not_retried() {
    let transport = ScriptedTransport::new();
    transport.push_post(Ok(HttpReply::new(
        200,
        r#"{"success": false, "error": "disk full"}"#,
    )));
    let (client, sleeps) = client_with(&transport);

    let outcome = client.update_font(FontUpdate::new().family("Arial")).unwrap();
    assert_eq!(
        outcome.failure(),
        Some(&DeliveryFailure::ServerRejected {
            error: Some("disk full".to_string())
        })
    );
    assert_eq!(transport.posts().len(), 1);
    assert!(sleeps.delays().is_empty());
}

#[test]
fn test_timeouts_and_refusals_retried() {
    let transport = ScriptedTransport::new();
    transport.push_post(Err(TransportError::Timeout));
    transport.push_post(Err(TransportError::Connect("connection refused".into())));
    let (client, sleeps) = client_with(&transport);

    let outcome = client.update_font(FontUpdate::new().family("Arial")).unwrap();
    assert_eq!(outcome, UpdateOutcome::Delivered);
    assert_eq!(transport.posts().len(), 3);
    assert_eq!(sleeps.delays().len(), 2);
}

#[test]
fn test_unclassified_error_not_retried() {
    let transport = ScriptedTransport::new();
    transport.push_post(Err(TransportError::Other("tls handshake failed".into())));
    let (client, sleeps) = client_with(&transport);

    let outcome = client.update_font(FontUpdate::new().family("Arial")).unwrap();
    assert_eq!(
        outcome,
        UpdateOutcome::Failed(DeliveryFailure::Unclassified(
            "tls handshake failed".into()
        ))
    );
    assert_eq!(transport.posts().len(), 1);
    assert!(sleeps.delays().is_empty());
}

#[test]
fn test_custom_retry_policy() {
    let transport = ScriptedTransport::new();
    for _ in 0..5 {
        transport.push_post(status(502));
    }
    let (client, sleeps) =
        client_with_options(&transport, true, RetryPolicy::new(5, Duration::from_millis(100)));

    let outcome = client.update_font(FontUpdate::new().family("Arial")).unwrap();
    assert!(matches!(
        outcome,
        UpdateOutcome::Failed(DeliveryFailure::RetriesExhausted { attempts: 5, .. })
    ));
    assert_eq!(
        sleeps.delays(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(400),
            Duration::from_millis(800),
        ]
    );
}

// ── Request shape ────────────────────────────────────────────────────────────

#[test]
fn test_partial_update_omits_unset_fields() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    client.update_font(FontUpdate::new().size("48px")).unwrap();

    let posts = transport.posts();
    assert_eq!(posts[0].url, format!("{BASE_URL}/api/overlay-config"));
    assert_eq!(posts[0].json(), json!({"font": {"size": "48px"}}));
}

#[test]
fn test_layout_wire_key() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    client
        .update_layout(LayoutUpdate::new().padding_left("30px"))
        .unwrap();
    assert_eq!(
        transport.posts()[0].json(),
        json!({"layout": {"paddingLeft": "30px"}})
    );
}

#[test]
fn test_empty_update_short_circuits() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    assert_eq!(client.update_font(FontUpdate::new()), Ok(UpdateOutcome::Empty));
    assert_eq!(client.update_colors(ColorsUpdate::new()), Ok(UpdateOutcome::Empty));
    assert_eq!(
        client.update_animation(AnimationUpdate::new()),
        Ok(UpdateOutcome::Empty)
    );
    assert_eq!(client.update_layout(LayoutUpdate::new()), Ok(UpdateOutcome::Empty));
    assert_eq!(
        client.update_full_config(&OverlayUpdate::default()),
        UpdateOutcome::Empty
    );
    assert!(!UpdateOutcome::Empty.is_applied());
    assert_eq!(transport.request_count(), 0);
}

// ── Full-config updates and themes ───────────────────────────────────────────

#[test]
fn test_full_config_single_request_without_validation() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    let update = OverlayUpdate::default()
        .with(Section::Font, Some(fields(&[("size", "huge")])))
        .with(Section::Colors, Some(fields(&[("text", "not-a-color")])))
        .with(Section::Layout, Some(SectionFields::new()));

    assert_eq!(client.update_full_config(&update), UpdateOutcome::Delivered);
    assert_eq!(client.update_full_config(&update), UpdateOutcome::Delivered);

    let posts = transport.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(
        posts[0].json(),
        json!({"font": {"size": "huge"}, "colors": {"text": "not-a-color"}})
    );
    assert_eq!(client.cached_fingerprints(), 0);
}

#[test]
fn test_apply_theme() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    assert_eq!(client.apply_theme("NEON"), Ok(UpdateOutcome::Delivered));
    let body = transport.posts()[0].json();
    for section in ["font", "colors", "animation", "layout"] {
        assert!(body.get(section).is_some(), "theme should set {section}");
    }
}

#[test]
fn test_unknown_theme_rejected_before_network() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    assert_eq!(
        client.apply_theme("vaporwave"),
        Err(ValidationError::UnknownTheme("vaporwave".to_string()))
    );
    assert_eq!(transport.request_count(), 0);
}

#[test]
fn test_reset_sends_server_defaults() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);

    assert!(client.reset_to_defaults().is_applied());
    let body = transport.posts()[0].json();
    assert_eq!(body["font"]["family"], "SEA");
    assert_eq!(body["font"]["size"], "64px");
    assert_eq!(body["colors"]["shadow"], "rgba(0,0,0,0.5)");
    assert_eq!(body["layout"]["paddingLeft"], "20px");
}

// ── get_config ───────────────────────────────────────────────────────────────

#[test]
fn test_get_config_uses_cache() {
    let transport = ScriptedTransport::new();
    transport.push_get(Ok(HttpReply::new(
        200,
        r#"{"font": {"family": "Arial"}, "version": 3}"#,
    )));
    let (client, _) = client_with(&transport);

    let first = client.get_config(true).unwrap();
    let second = client.get_config(true).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.field_str(Section::Font, "family"), Some("Arial"));
    assert_eq!(first.extra.get("version"), Some(&json!(3)));
    assert_eq!(transport.request_count(), 1);
    assert_eq!(
        transport.requests()[0].url,
        format!("{BASE_URL}/api/overlay-config")
    );
}

#[test]
fn test_get_config_bypass_cache() {
    let transport = ScriptedTransport::new();
    transport.push_get(Ok(HttpReply::new(200, "{}")));
    transport.push_get(Ok(HttpReply::new(200, "{}")));
    let (client, _) = client_with(&transport);

    client.get_config(true).unwrap();
    client.get_config(false).unwrap();
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn test_get_config_without_cache_never_stores() {
    let transport = ScriptedTransport::new();
    transport.push_get(Ok(HttpReply::new(200, "{}")));
    transport.push_get(Ok(HttpReply::new(200, "{}")));
    let (client, _) = client_with_options(&transport, false, RetryPolicy::default());

    client.get_config(true).unwrap();
    client.get_config(true).unwrap();
    assert_eq!(transport.request_count(), 2);
}

#[test]
fn test_get_config_unavailable() {
    let transport = ScriptedTransport::new();
    transport.push_get(status(500));
    transport.push_get(Err(TransportError::Connect("refused".into())));
    transport.push_get(Ok(HttpReply::new(200, "not json")));
    transport.push_get(Ok(HttpReply::new(200, "[1, 2]")));
    let (client, _) = client_with(&transport);

    for _ in 0..4 {
        assert!(client.get_config(false).is_none());
    }
    // GET is never retried.
    assert_eq!(transport.request_count(), 4);
}

// ── Misc ─────────────────────────────────────────────────────────────────────

#[test]
fn test_health_probe() {
    let transport = ScriptedTransport::new();
    transport.push_get(Ok(HttpReply::new(200, "ok")));
    transport.push_get(status(503));
    let (client, _) = client_with(&transport);

    assert!(client.is_server_healthy());
    assert!(!client.is_server_healthy());
    assert_eq!(transport.requests()[0].url, format!("{BASE_URL}/"));
}

#[test]
fn test_concurrent_updates_share_cache() {
    let transport = ScriptedTransport::new();
    let (client, _) = client_with(&transport);
    let client = std::sync::Arc::new(client);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let client = client.clone();
            std::thread::spawn(move || {
                client
                    .update_font(FontUpdate::new().size(format!("{}px", 10 + i)))
                    .unwrap()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), UpdateOutcome::Delivered);
    }
    assert_eq!(client.cached_fingerprints(), 4);
}
