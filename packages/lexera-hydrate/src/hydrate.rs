/// Hydration: derive display fields (rendered titles, search text, parsed
/// dates, resolved links, query output) from the raw board data.
///
/// Lanes hydrate concurrently; each lane renders its own title before its
/// items hydrate concurrently. The first failure is returned and the rest of
/// the in-flight work is dropped. Failures are reported to the context's error
/// sink where they happen, once.
use futures::future::try_join_all;

use crate::config::{DATE_FORMAT_KEY, TIME_FORMAT_KEY};
use crate::context::HydrationContext;
use crate::datefmt;
use crate::error::HydrateError;
use crate::query::{EmbeddedQuery, HOST_UNAVAILABLE_MESSAGE};
use crate::types::{Board, Fragment, Item, ItemMetadata, ItemTime, Lane};

/// Render a lane's title.
pub async fn hydrate_lane<'a>(
    ctx: &HydrationContext,
    lane: &'a mut Lane,
) -> Result<&'a mut Lane, HydrateError> {
    match ctx.renderer().render(ctx.view(), &lane.title).await {
        Ok(dom) => {
            lane.dom = Some(dom);
            Ok(lane)
        }
        Err(e) => {
            let err = HydrateError::lane_render(&lane.id, e);
            ctx.report(&err);
            Err(err)
        }
    }
}

/// Render an item's title and derive everything its metadata implies.
pub async fn hydrate_item<'a>(
    ctx: &HydrationContext,
    item: &'a mut Item,
) -> Result<&'a mut Item, HydrateError> {
    let dom = match ctx.renderer().render(ctx.view(), &item.title).await {
        Ok(dom) => dom,
        Err(e) => {
            let err = HydrateError::item_render(&item.id, e);
            ctx.report(&err);
            return Err(err);
        }
    };

    item.title_search = Some(ctx.search().extract(
        &dom,
        &item.metadata.tags,
        item.metadata.file_metadata.as_ref(),
    ));
    let dom = item.dom.insert(dom);

    let metadata = &mut item.metadata;
    clear_derived(metadata);
    apply_date_time(ctx, &item.id, metadata);
    resolve_file(ctx, metadata);

    if let Some(source) = metadata.code_result_str.clone().filter(|s| !s.is_empty()) {
        run_embedded_query(ctx, &source, dom, metadata).await;
    }

    Ok(item)
}

/// Hydrate every lane and item of a board.
pub async fn hydrate_board<'a>(
    ctx: &HydrationContext,
    board: &'a mut Board,
) -> Result<&'a mut Board, HydrateError> {
    let ctx = &ctx.scoped(board.settings.as_ref());
    log::debug!(
        "[lexera.hydrate.board] Hydrating board {} ({} lanes, {} items)",
        board.id,
        board.lanes.len(),
        board.item_count()
    );

    try_join_all(board.lanes.iter_mut().map(|lane| async move {
        hydrate_lane(ctx, lane).await?;
        try_join_all(lane.items.iter_mut().map(|item| hydrate_item(ctx, item))).await?;
        Ok::<(), HydrateError>(())
    }))
    .await?;

    Ok(board)
}

fn clear_derived(metadata: &mut ItemMetadata) {
    metadata.date = None;
    metadata.time = None;
    metadata.file = None;
    metadata.code_result = None;
    metadata.query_result = None;
}

fn apply_date_time(ctx: &HydrationContext, item_id: &str, metadata: &mut ItemMetadata) {
    if let Some(date_str) = metadata.date_str.as_deref().filter(|s| !s.is_empty()) {
        let pattern = ctx.setting(DATE_FORMAT_KEY).unwrap_or_default();
        metadata.date = datefmt::parse_date(date_str, &pattern);
        if metadata.date.is_none() {
            log::warn!(
                "[lexera.hydrate.item] Item {}: date '{}' does not match format '{}'",
                item_id,
                date_str,
                pattern
            );
        }
    }

    if let Some(time_str) = metadata.time_str.as_deref().filter(|s| !s.is_empty()) {
        let pattern = ctx.setting(TIME_FORMAT_KEY).unwrap_or_default();
        match datefmt::parse_time(time_str, &pattern) {
            Some(time) => {
                metadata.time = Some(match metadata.date {
                    Some(date) => ItemTime::DateTime(date.and_time(time)),
                    None => ItemTime::TimeOfDay(time),
                });
            }
            None => log::warn!(
                "[lexera.hydrate.item] Item {}: time '{}' does not match format '{}'",
                item_id,
                time_str,
                pattern
            ),
        }
    }
}

fn resolve_file(ctx: &HydrationContext, metadata: &mut ItemMetadata) {
    if let Some(accessor) = &metadata.file_accessor {
        metadata.file = ctx.links().resolve_link(&accessor.target, ctx.source_path());
    }
}

/// Query problems never fail the item; they end up in `code_result`.
async fn run_embedded_query(
    ctx: &HydrationContext,
    source: &str,
    dom: &mut Fragment,
    metadata: &mut ItemMetadata,
) {
    let Some(host) = ctx.query_host() else {
        metadata.code_result = Some(HOST_UNAVAILABLE_MESSAGE.to_string());
        return;
    };

    let query = match EmbeddedQuery::parse(source) {
        Ok(Some(query)) => query,
        Ok(None) => return,
        Err(e) => {
            metadata.code_result = Some(e.to_string());
            return;
        }
    };

    match query {
        EmbeddedQuery::Script(code) => {
            log::debug!("[lexera.hydrate.query] Running script ({} bytes)", code.len());
            if let Err(e) = host.run_script(&code, dom, ctx.view(), ctx.source_path()).await {
                log::warn!("[lexera.hydrate.query] Script failed: {}", e);
                metadata.code_result = Some(format!("Query failed: {}", e));
            }
        }
        EmbeddedQuery::Query(query) => {
            log::debug!("[lexera.hydrate.query] Running query: {}", query);
            // The result is kept on the metadata only; it is not rendered into the title.
            match host.query(&query).await {
                Ok(result) => metadata.query_result = Some(result),
                Err(e) => {
                    log::warn!("[lexera.hydrate.query] Query failed: {}", e);
                    metadata.code_result = Some(format!("Query failed: {}", e));
                }
            }
        }
    }
}
