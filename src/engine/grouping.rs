// ==========================================
// 奶牛日粮优化系统 - 牛群分组器
// ==========================================
// 职责: 按分组依据将牛群切分为 1-3 个营养分组
// 红线: 纯函数,输入牛群本身不被修改
// ==========================================

use crate::domain::cow::{Cohort, Cow};
use crate::domain::types::GroupCriterion;
use crate::engine::error::{EngineError, EngineResult};
use tracing::debug;

// ==========================================
// HerdPartitioner - 牛群分组器(纯函数)
// ==========================================
pub struct HerdPartitioner;

impl HerdPartitioner {
    /// 牛群分组
    ///
    /// # 规则
    /// - 按分组依据升序稳定排序(依据值相同保持输入先后次序)
    /// - 第 i 组边界为 [⌊i*N/g⌋, ⌊(i+1)*N/g⌋),组间牛数最多相差 1
    /// - group_count=1 时跳过排序,整群按输入次序原样成组
    /// - N < group_count 时拒绝(会产生空组)
    ///
    /// # 参数
    /// - cows: 牛群(N 头)
    /// - group_count: 分组数,1/2/3
    /// - criterion: 分组依据(DIM / NEL / MILK)
    pub fn partition(
        cows: &[Cow],
        group_count: usize,
        criterion: GroupCriterion,
    ) -> EngineResult<Vec<Cohort>> {
        if cows.is_empty() {
            return Err(EngineError::InvalidInput("牛群为空,无法分组".to_string()));
        }
        if !(1..=3).contains(&group_count) {
            return Err(EngineError::InvalidInput(format!(
                "分组数必须为 1/2/3,实际 {}",
                group_count
            )));
        }
        if cows.len() < group_count {
            return Err(EngineError::InvalidInput(format!(
                "牛数 {} 小于分组数 {},会产生空组",
                cows.len(),
                group_count
            )));
        }

        // 单组直接整群成组,不排序
        if group_count == 1 {
            return Ok(vec![Cohort {
                index: 0,
                cows: cows.to_vec(),
            }]);
        }

        let mut sorted: Vec<Cow> = cows.to_vec();
        // 稳定排序: 依据值相同的牛保持输入先后次序
        sorted.sort_by(|a, b| {
            a.criterion_value(criterion)
                .partial_cmp(&b.criterion_value(criterion))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let n = sorted.len();
        let mut cohorts = Vec::with_capacity(group_count);
        for i in 0..group_count {
            let start = i * n / group_count;
            let end = (i + 1) * n / group_count;
            cohorts.push(Cohort {
                index: i,
                cows: sorted[start..end].to_vec(),
            });
        }

        debug!(
            "牛群分组完成: N={} 依据={} 组规模={:?}",
            n,
            criterion,
            cohorts.iter().map(|c| c.size()).collect::<Vec<_>>()
        );
        Ok(cohorts)
    }
}
