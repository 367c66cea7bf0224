use super::status::StudentStatus;

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

// 恰好落在 .5 上时取偶数，如 80.25 → 80.2
fn round_half_even(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// 已批改提交的加权平均分，保留一位小数（银行家舍入）
///
/// 输入为 `(score, weight)`；权重和为 0 时返回 `None`。
pub fn weighted_average<I>(graded: I) -> Option<f64>
where
    I: IntoIterator<Item = (f64, i32)>,
{
    let (weighted_sum, weight_sum) = graded
        .into_iter()
        .fold((0.0, 0i64), |(sum, weights), (score, weight)| {
            (sum + score * f64::from(weight), weights + i64::from(weight))
        });

    if weight_sum == 0 {
        return None;
    }
    Some(round_half_even(weighted_sum / weight_sum as f64, 1))
}

/// 假设成绩计算中的一行
#[derive(Debug, Clone)]
pub struct HypothesisRow {
    pub status: StudentStatus,
    pub weight: i32,
    /// 用户填写的假设分数（只对 NotDue / Ungraded 生效）
    pub hypothetical: Option<f64>,
}

impl HypothesisRow {
    /// 该行是否采用了假设分数
    pub fn uses_hypothetical(&self) -> bool {
        self.hypothetical_score().is_some()
    }

    fn hypothetical_score(&self) -> Option<f64> {
        match self.status {
            StudentStatus::NotDue | StudentStatus::Ungraded => self
                .hypothetical
                .filter(|s| s.is_finite() && (0.0..=100.0).contains(s)),
            StudentStatus::Graded(_) | StudentStatus::Missing => None,
        }
    }
}

/// 假设成绩，保留两位小数
///
/// 已批改用实际分数，Missing 按 0 分计入，NotDue / Ungraded 使用假设分数，
/// 没有合法假设分数的行不参与计算。权重和为 0 时结果为 0。
pub fn hypothesize(rows: &[HypothesisRow]) -> f64 {
    let mut weighted = 0.0;
    let mut total_weight = 0.0;

    for row in rows {
        let score = match row.status {
            StudentStatus::Graded(score) => Some(score),
            StudentStatus::Missing => Some(0.0),
            StudentStatus::NotDue | StudentStatus::Ungraded => row.hypothetical_score(),
        };
        if let Some(score) = score {
            let weight = f64::from(row.weight);
            weighted += score / 100.0 * weight;
            total_weight += weight;
        }
    }

    if total_weight == 0.0 {
        return 0.0;
    }
    round_to(weighted / total_weight * 100.0, 2)
}
