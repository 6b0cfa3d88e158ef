/// Targeted re-hydration after JSON-patch operations.
///
/// Only `add`/`replace` operations that touch a title, a date/time string,
/// a file accessor, or an array slot can change derived fields. Their numeric
/// path segments address the lane (`[l]`) or item (`[l, i]`) to redo.
use std::collections::{BTreeMap, HashSet};
use std::sync::LazyLock;

use futures::future::try_join_all;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::context::HydrationContext;
use crate::error::HydrateError;
use crate::hydrate::{hydrate_item, hydrate_lane};
use crate::types::{Board, EntityKind, Path};

static FILE_ACCESSOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/fileAccessor/.+$").unwrap());

const HYDRATION_SUFFIXES: &[&str] = &["/title", "/titleRaw", "/dateStr", "/timeStr"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    Add,
    Replace,
    Remove,
    Move,
    Copy,
    Test,
    /// Any other op name (`_get` and friends); never affects hydration.
    #[serde(other)]
    Other,
}

/// One JSON-patch operation. Values are irrelevant to hydration and ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchOp {
    pub op: PatchKind,
    pub path: String,
}

impl PatchOp {
    pub fn new(op: PatchKind, path: impl Into<String>) -> Self {
        Self {
            op,
            path: path.into(),
        }
    }
}

/// Whether applying `op` can change any hydrated field.
pub fn op_affects_hydration(op: &PatchOp) -> bool {
    if !matches!(op.op, PatchKind::Add | PatchKind::Replace) {
        return false;
    }
    HYDRATION_SUFFIXES.iter().any(|suffix| op.path.ends_with(suffix))
        || op.path.ends_with(|c: char| c.is_ascii_digit())
        || FILE_ACCESSOR_RE.is_match(&op.path)
}

/// The numeric segments of a patch path, in order.
pub fn index_path(path: &str) -> Path {
    path.split('/')
        .filter(|segment| !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|segment| segment.parse::<usize>().ok())
        .collect()
}

/// Distinct entity paths to re-hydrate, in first-seen order.
pub fn paths_to_hydrate(ops: &[PatchOp]) -> Vec<Path> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for op in ops.iter().filter(|op| op_affects_hydration(op)) {
        let path = index_path(&op.path);
        let key = path
            .iter()
            .map(|idx| idx.to_string())
            .collect::<Vec<_>>()
            .join(",");
        if seen.insert(key) {
            paths.push(path);
        }
    }

    paths
}

/// Targets grouped per lane.
#[derive(Debug, Default)]
struct LaneTargets {
    lane: bool,
    items: HashSet<usize>,
}

/// Re-hydrate only the lanes and items `ops` touched.
pub async fn hydrate_post_op<'a>(
    ctx: &HydrationContext,
    board: &'a mut Board,
    ops: &[PatchOp],
) -> Result<&'a mut Board, HydrateError> {
    let ctx = &ctx.scoped(board.settings.as_ref());
    let mut targets: BTreeMap<usize, LaneTargets> = BTreeMap::new();

    for path in paths_to_hydrate(ops) {
        match (board.entity_kind(&path), path.as_slice()) {
            (Some(EntityKind::Lane), &[lane]) => {
                targets.entry(lane).or_default().lane = true;
            }
            (Some(EntityKind::Item), &[lane, item]) => {
                targets.entry(lane).or_default().items.insert(item);
            }
            _ => {
                log::debug!(
                    "[lexera.hydrate.patch] Path {:?} does not address a lane or item, skipping",
                    path
                );
            }
        }
    }

    if targets.is_empty() {
        return Ok(board);
    }

    log::debug!(
        "[lexera.hydrate.patch] Re-hydrating {} lane(s) on board {}",
        targets.len(),
        board.id
    );

    try_join_all(
        board
            .lanes
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, lane)| targets.remove(&idx).map(|t| (lane, t)))
            .map(|(lane, t)| async move {
                if t.lane {
                    hydrate_lane(ctx, lane).await?;
                }
                try_join_all(
                    lane.items
                        .iter_mut()
                        .enumerate()
                        .filter(|(idx, _)| t.items.contains(idx))
                        .map(|(_, item)| hydrate_item(ctx, item)),
                )
                .await?;
                Ok::<(), HydrateError>(())
            }),
    )
    .await?;

    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn op(kind: PatchKind, path: &str) -> PatchOp {
        PatchOp::new(kind, path)
    }

    #[test]
    fn test_affecting_suffixes() {
        assert!(op_affects_hydration(&op(PatchKind::Replace, "/lanes/0/title")));
        assert!(op_affects_hydration(&op(PatchKind::Add, "/lanes/0/items/2/titleRaw")));
        assert!(op_affects_hydration(&op(PatchKind::Replace, "/lanes/1/items/0/metadata/dateStr")));
        assert!(op_affects_hydration(&op(PatchKind::Replace, "/lanes/1/items/0/metadata/timeStr")));
        assert!(op_affects_hydration(&op(PatchKind::Add, "/lanes/1/items/3")));
        assert!(op_affects_hydration(&op(
            PatchKind::Replace,
            "/lanes/1/items/0/metadata/fileAccessor/target"
        )));
    }

    #[test]
    fn test_non_affecting_ops() {
        assert!(!op_affects_hydration(&op(PatchKind::Remove, "/lanes/0/title")));
        assert!(!op_affects_hydration(&op(PatchKind::Move, "/lanes/0/items/1")));
        assert!(!op_affects_hydration(&op(PatchKind::Replace, "/lanes/0/items/1/checked")));
        assert!(!op_affects_hydration(&op(PatchKind::Replace, "/lanes/0/items/1/metadata/fileAccessor/")));
        assert!(!op_affects_hydration(&op(PatchKind::Replace, "/lanes/0/subtitle2x")));
    }

    #[test]
    fn test_index_path() {
        assert_eq!(index_path("/lanes/3/items/12/title"), vec![3, 12]);
        assert_eq!(index_path("/children/0/title"), vec![0]);
        assert_eq!(index_path("/lanes/v2/items/1"), vec![1]);
        assert!(index_path("/title").is_empty());
    }

    #[test]
    fn test_paths_deduplicated_in_order() {
        let ops = vec![
            op(PatchKind::Replace, "/lanes/1/items/0/title"),
            op(PatchKind::Replace, "/lanes/0/title"),
            op(PatchKind::Replace, "/lanes/1/items/0/metadata/dateStr"),
            op(PatchKind::Remove, "/lanes/2/title"),
            op(PatchKind::Replace, "/lanes/0/title"),
        ];
        assert_eq!(paths_to_hydrate(&ops), vec![vec![1, 0], vec![0]]);
    }

    #[test]
    fn test_patch_op_wire_shape() {
        let ops: Vec<PatchOp> = serde_json::from_str(
            r#"[{"op":"replace","path":"/children/0/title","value":"New"},{"op":"remove","path":"/children/1"}]"#,
        )
        .unwrap();
        assert_eq!(ops[0], op(PatchKind::Replace, "/children/0/title"));
        assert_eq!(ops[1].op, PatchKind::Remove);
    }

    #[test]
    fn test_unknown_op_kind_deserializes() {
        let ops: Vec<PatchOp> = serde_json::from_str(
            r#"[{"op":"_get","path":"/lanes/0/title"},{"op":"replace","path":"/lanes/1/title"}]"#,
        )
        .unwrap();
        assert_eq!(ops[0].op, PatchKind::Other);
        assert!(!op_affects_hydration(&ops[0]));
        assert_eq!(paths_to_hydrate(&ops), vec![vec![1]]);
    }
}
