//! Calendar, agenda and cost summary tests
mod common;

use common::*;

#[tokio::test]
async fn test_calendar_shows_first_page() {
    let (handler, _dir) = get_configured_handler().await;
    add(&handler, "Castle", "Attraction", 2.0).await;
    add(&handler, "Beach", "Rest", 3.0).await;
    handler
        .handle_schedule_item("Castle".to_string(), "2026-07-25".to_string(), 10)
        .await
        .unwrap();

    let text = handler.handle_calendar(None, None).await.unwrap();
    assert!(text.starts_with("Coast: 2026-07-24 to 2026-07-26 (day 1 of 14)"));
    assert!(text.contains("| 24.07"));
    assert!(text.contains("| 26.07"));
    assert!(!text.contains("27.07"));

    let ten = text.lines().find(|l| l.starts_with("10:00")).unwrap();
    assert!(ten.contains("A Castle"));
    let noon = text.lines().find(|l| l.starts_with("12:00")).unwrap();
    assert!(!noon.contains('A'));
    assert!(text.contains("1 item(s) waiting in the idea pool"));
}

#[tokio::test]
async fn test_calendar_offset_is_clamped() {
    let (handler, _dir) = get_configured_handler().await;

    let page = handler.handle_calendar(Some(3), None).await.unwrap();
    assert!(page.starts_with("Coast: 2026-07-27 to 2026-07-29 (day 4 of 14)"));

    // past the end the last full page is shown
    let last = handler.handle_calendar(Some(100), None).await.unwrap();
    assert!(last.starts_with("Coast: 2026-08-04 to 2026-08-06 (day 12 of 14)"));

    let wide = handler.handle_calendar(Some(0), Some(7)).await.unwrap();
    assert!(wide.starts_with("Coast: 2026-07-24 to 2026-07-30"));
}

#[tokio::test]
async fn test_calendar_overnight_item_continues_next_day() {
    let (handler, _dir) = get_configured_handler().await;
    add(&handler, "Night bus", "Route", 4.0).await;
    handler
        .handle_schedule_item("Night bus".to_string(), "2026-07-24".to_string(), 22)
        .await
        .unwrap();

    let text = handler.handle_calendar(None, None).await.unwrap();
    let late = text.lines().find(|l| l.starts_with("22:00")).unwrap();
    assert!(late.contains("R Night bus"));
    let early = text.lines().find(|l| l.starts_with("01:00")).unwrap();
    assert!(early.contains("R |"));
    assert!(text.contains("Everything is scheduled!"));
}

#[tokio::test]
async fn test_agenda_splits_at_midnight() {
    let (handler, _dir) = get_configured_handler().await;
    add(&handler, "Night bus", "Route", 5.0).await;
    add(&handler, "Castle", "Attraction", 2.0).await;
    handler
        .handle_schedule_item("Night bus".to_string(), "2026-07-25".to_string(), 22)
        .await
        .unwrap();
    handler
        .handle_schedule_item("Castle".to_string(), "2026-07-26".to_string(), 10)
        .await
        .unwrap();

    let text = handler.handle_agenda(None).await.unwrap();
    assert!(text.contains("2026-07-25 (Saturday)"));
    assert!(text.contains("22:00-..    Night bus [Route]"));
    assert!(text.contains("2026-07-26 (Sunday)"));
    assert!(text.contains("   ..-03:00 Night bus [Route]"));
    assert!(text.contains("10:00-12:00 Castle [Attraction]"));

    let one_day = handler
        .handle_agenda(Some("2026-07-25".to_string()))
        .await
        .unwrap();
    assert!(one_day.contains("Night bus"));
    assert!(!one_day.contains("Castle"));
}

#[tokio::test]
async fn test_agenda_empty() {
    let (handler, _dir) = get_configured_handler().await;
    let text = handler.handle_agenda(None).await.unwrap();
    assert_eq!(text, "Nothing scheduled\n");
}

#[tokio::test]
async fn test_cost_summary_splits_group_costs() {
    let (handler, _dir) = get_configured_handler().await;
    handler
        .handle_add_item(
            "Museum".to_string(),
            "Attraction".to_string(),
            2.0,
            Some(25.0),
            None,
        )
        .await
        .unwrap();
    handler
        .handle_add_item(
            "Apartment".to_string(),
            "Rest".to_string(),
            1.0,
            Some(300.0),
            Some("Shared".to_string()),
        )
        .await
        .unwrap();
    handler
        .handle_add_item(
            "Petrol".to_string(),
            "Route".to_string(),
            1.0,
            Some(100.0),
            Some("Fuel".to_string()),
        )
        .await
        .unwrap();

    let text = handler.handle_cost_summary(None).await.unwrap();
    assert!(text.contains("for 2 participant(s)"));
    assert!(text.contains("Individual (per person): 25.00"));
    assert!(text.contains("Shared (group): 300.00"));
    assert!(text.contains("Fuel (group): 100.00"));
    assert!(text.contains("Shared + fuel per person: 200.00"));
    assert!(text.contains("Total per person: 225.00"));
    assert!(text.contains("Group total: 450.00"));
    assert!(text.contains("Attraction: 50.00"));
}

#[tokio::test]
async fn test_cost_summary_scheduled_only() {
    let (handler, _dir) = get_configured_handler().await;
    handler
        .handle_add_item(
            "Museum".to_string(),
            "Attraction".to_string(),
            2.0,
            Some(25.0),
            None,
        )
        .await
        .unwrap();
    handler
        .handle_add_item(
            "Boat".to_string(),
            "Sport".to_string(),
            2.0,
            Some(80.0),
            Some("Shared".to_string()),
        )
        .await
        .unwrap();
    handler
        .handle_schedule_item("Boat".to_string(), "2026-07-25".to_string(), 10)
        .await
        .unwrap();

    let text = handler.handle_cost_summary(Some(true)).await.unwrap();
    assert!(text.contains("scheduled items"));
    assert!(text.contains("Individual (per person): 0.00"));
    assert!(text.contains("Total per person: 40.00"));
}

#[tokio::test]
async fn test_calendar_page_width_is_bounded_by_trip() {
    let (handler, _dir) = get_configured_handler().await;

    let text = handler
        .handle_calendar(Some(u32::MAX), Some(u32::MAX))
        .await
        .unwrap();
    assert!(text.starts_with("Coast: 2026-07-24 to 2026-08-06 (day 1 of 14)"));

    let narrow = handler.handle_calendar(None, Some(0)).await.unwrap();
    assert!(narrow.starts_with("Coast: 2026-07-24 to 2026-07-24"));
}
