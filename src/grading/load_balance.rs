use std::collections::HashMap;

/// 选出当前负载最小的批改人
///
/// `candidates` 为助教 ID；`load` 为各助教在该作业下已分配的提交数（缺省为 0）。
/// 负载相同取 ID 最小者，没有候选人返回 `None`。
pub fn pick_least_loaded(candidates: &[i64], load: &HashMap<i64, u64>) -> Option<i64> {
    candidates
        .iter()
        .copied()
        .min_by_key(|id| (load.get(id).copied().unwrap_or(0), *id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_least_loaded() {
        let load = HashMap::from([(2, 3), (5, 1), (9, 2)]);
        assert_eq!(pick_least_loaded(&[2, 5, 9], &load), Some(5));
    }

    #[test]
    fn test_tie_breaks_on_lowest_id() {
        let load = HashMap::from([(7, 1), (4, 1)]);
        assert_eq!(pick_least_loaded(&[7, 4], &load), Some(4));
        // 没有记录的助教负载视为 0
        assert_eq!(pick_least_loaded(&[7, 4, 11], &load), Some(11));
    }

    #[test]
    fn test_no_candidates() {
        assert_eq!(pick_least_loaded(&[], &HashMap::new()), None);
    }
}
