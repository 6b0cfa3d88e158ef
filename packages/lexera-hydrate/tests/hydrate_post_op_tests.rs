mod common;

use chrono::NaiveDate;
use common::{harness, sample_board, FAIL_MARKER};
use lexera_hydrate::{hydrate_board, hydrate_post_op, PatchKind, PatchOp};

fn replace(path: &str) -> PatchOp {
    PatchOp::new(PatchKind::Replace, path)
}

#[tokio::test]
async fn test_title_change_rehydrates_only_that_lane() {
    let h = harness();
    let mut board = sample_board();
    board.lanes[0].title = "Backlog".into();

    hydrate_post_op(&h.ctx, &mut board, &[replace("/children/0/title")])
        .await
        .unwrap();

    assert_eq!(h.renderer.rendered(), vec!["Backlog".to_string()]);
    assert_eq!(board.lanes[0].dom.as_ref().unwrap().html, "<p>Backlog</p>");
    assert!(board.lanes[1].dom.is_none());
    assert!(board.lanes[0].items.iter().all(|item| item.dom.is_none()));
}

#[tokio::test]
async fn test_duplicate_paths_hydrate_once() {
    let h = harness();
    let mut board = sample_board();
    board.lanes[1].items[0].metadata.date_str = Some("2024-01-02".into());
    let ops = vec![
        replace("/lanes/1/items/0/title"),
        replace("/lanes/1/items/0/metadata/dateStr"),
        PatchOp::new(PatchKind::Add, "/lanes/1/items/0/metadata/fileAccessor/target"),
    ];

    hydrate_post_op(&h.ctx, &mut board, &ops).await.unwrap();

    assert_eq!(h.renderer.rendered(), vec!["Ship #release".to_string()]);
    assert_eq!(
        board.lanes[1].items[0].metadata.date,
        NaiveDate::from_ymd_opt(2024, 1, 2)
    );
}

#[tokio::test]
async fn test_lane_and_item_targets_together() {
    let h = harness();
    let mut board = sample_board();
    let ops = vec![
        replace("/lanes/0/items/1/title"),
        replace("/lanes/0/title"),
        PatchOp::new(PatchKind::Add, "/lanes/1/items/0"),
    ];

    hydrate_post_op(&h.ctx, &mut board, &ops).await.unwrap();

    let mut rendered = h.renderer.rendered();
    rendered.sort();
    assert_eq!(rendered, vec!["Plan", "Ship #release", "Todo"]);
    assert!(board.lanes[0].items[0].dom.is_none());
    assert!(board.lanes[0].items[1].dom.is_some());
}

#[tokio::test]
async fn test_non_affecting_and_dangling_ops_do_nothing() {
    let h = harness();
    let mut board = sample_board();
    let ops = vec![
        PatchOp::new(PatchKind::Remove, "/lanes/0/title"),
        replace("/lanes/0/items/0/checked"),
        replace("/lanes/9/title"),
        replace("/lanes/0/items/7/title"),
        replace("/title"),
    ];

    hydrate_post_op(&h.ctx, &mut board, &ops).await.unwrap();

    assert!(h.renderer.rendered().is_empty());
}

#[tokio::test]
async fn test_failure_propagates_and_reports_once() {
    let h = harness();
    let mut board = sample_board();
    hydrate_board(&h.ctx, &mut board).await.unwrap();
    board.lanes[2].title = format!("Done {}", FAIL_MARKER);

    let err = hydrate_post_op(&h.ctx, &mut board, &[replace("/lanes/2/title")])
        .await
        .unwrap_err();

    assert_eq!(h.sink.errors(), vec![err]);
}

#[tokio::test]
async fn test_ops_from_json() {
    let h = harness();
    let mut board = sample_board();
    board.lanes[0].items[0].metadata.time_str = Some("09:00".into());
    let ops: Vec<PatchOp> = serde_json::from_str(
        r#"[{"op":"replace","path":"/lanes/0/items/0/metadata/timeStr","value":"09:00"}]"#,
    )
    .unwrap();

    hydrate_post_op(&h.ctx, &mut board, &ops).await.unwrap();

    let time = board.lanes[0].items[0].metadata.time.unwrap();
    assert_eq!(time.time(), chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap());
}
