// ==========================================
// SLA Hub 报表系统 - 业务默认值覆写
// ==========================================
// 职责: LINE_HAUL_DAYS / IS_ACTIVE / RGN / CAR_TYP / HUB_TO_CUST_DAYS
// 策略: 无条件覆写（与 Resolver 的补缺策略分开，不得合并）
// ==========================================

use crate::config::PipelineConfig;
use crate::domain::{CellValue, SlaField, SlaRecord, SlaTable};
use tracing::debug;

pub struct AttributeDefaulter {
    region: String,
    carrier_type: String,
}

impl AttributeDefaulter {
    pub fn new(region: impl Into<String>, carrier_type: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            carrier_type: carrier_type.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(config.region.clone(), config.carrier_type.clone())
    }

    /// 覆写整表
    pub fn apply(&self, table: &mut SlaTable) {
        for record in &mut table.records {
            self.apply_record(record);
        }
        debug!(
            records = table.len(),
            region = %self.region,
            carrier_type = %self.carrier_type,
            "默认值覆写完成"
        );
    }

    /// 覆写单条记录
    ///
    /// # 规则
    /// - LINE_HAUL_DAYS := 0
    /// - IS_ACTIVE := 1
    /// - RGN := 区域常量
    /// - CAR_TYP := 承运类型常量
    /// - HUB_TO_CUST_DAYS := TOT_DAYS
    pub fn apply_record(&self, record: &mut SlaRecord) {
        record.set(SlaField::LineHaulDays, CellValue::Int(0));
        record.set(SlaField::IsActive, CellValue::Int(1));
        record.set(SlaField::Rgn, CellValue::Text(self.region.clone()));
        record.set(SlaField::CarTyp, CellValue::Text(self.carrier_type.clone()));
        let total_days = record.get(SlaField::TotDays).clone();
        record.set(SlaField::HubToCustDays, total_days);
    }
}

impl Default for AttributeDefaulter {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}
