// ==========================================
// SLA Hub 报表系统 - 处理流水线编排器
// ==========================================
// 用途: 协调各阶段的执行顺序
// 顺序: 读取 → 列名标准化 → Hub/邮编解析 → 默认值覆写 → Master 合并 → 导出
// 红线: 流水线无跨调用状态；任一阶段失败即终止，输出文件保持原状
// ==========================================

use crate::config::{ConfigError, PipelineConfig};
use crate::domain::{ProcessingReport, RawTable, ResolutionStats, SlaTable};
use crate::engine::{AttributeDefaulter, MasterMerger, Resolver, SchemaNormalizer};
use crate::exporter::{ExportError, ReportExporter};
use crate::importer::{ImportError, SpreadsheetSource, UniversalFileParser};
use chrono::Utc;
use std::path::Path;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, instrument};
use uuid::Uuid;

// ==========================================
// PipelineError - 流水线错误
// ==========================================
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("输入读取失败: {0}")]
    Import(#[from] ImportError),

    #[error("报表导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

// ==========================================
// SlaPipeline - 流水线
// ==========================================
pub struct SlaPipeline {
    source: Box<dyn SpreadsheetSource>,
    normalizer: SchemaNormalizer,
    resolver: Resolver<'static>,
    defaulter: AttributeDefaulter,
    merger: MasterMerger,
    exporter: ReportExporter,
}

impl SlaPipeline {
    /// 按配置创建（按扩展名自动选择 Excel / CSV 解析器）
    pub fn new(config: &PipelineConfig) -> Self {
        Self::with_source(Box::new(UniversalFileParser), config)
    }

    /// 校验配置后创建
    ///
    /// # 返回
    /// - Err(Config): 配置值不合法（如分表前缀超长或含非法字符），不执行任何读写
    pub fn try_new(config: &PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// 使用指定数据源创建
    ///
    /// # 参数
    /// - source: 表格数据源
    /// - config: 处理配置
    pub fn with_source(source: Box<dyn SpreadsheetSource>, config: &PipelineConfig) -> Self {
        Self {
            source,
            normalizer: SchemaNormalizer,
            resolver: Resolver::new(),
            defaulter: AttributeDefaulter::from_config(config),
            merger: MasterMerger,
            exporter: ReportExporter::from_config(config),
        }
    }

    /// 执行完整流程（自动生成运行 ID）
    pub fn run(
        &self,
        main_path: &Path,
        master_path: &Path,
        output_path: &Path,
    ) -> PipelineResult<ProcessingReport> {
        let run_id = Uuid::new_v4().to_string();
        self.run_with_id(&run_id, main_path, master_path, output_path)
    }

    /// 执行完整流程
    ///
    /// # 参数
    /// - run_id: 运行 ID（写入报告与日志）
    /// - main_path: SLA 主表
    /// - master_path: Master 参考表
    /// - output_path: 输出 xlsx 路径
    ///
    /// # 返回
    /// - Ok(ProcessingReport): 各阶段统计
    /// - Err: 输入读取失败或输出写入失败（输出文件不会出现半成品）
    #[instrument(
        skip(self),
        fields(main = %main_path.display(), master = %master_path.display())
    )]
    pub fn run_with_id(
        &self,
        run_id: &str,
        main_path: &Path,
        master_path: &Path,
        output_path: &Path,
    ) -> PipelineResult<ProcessingReport> {
        let started_at = Utc::now();
        let timer = Instant::now();

        // ==========================================
        // 步骤1: 读取输入
        // ==========================================
        debug!("步骤1: 读取主表与 Master 表");
        let main_raw = self.source.read_table(main_path)?;
        let master_raw = self.source.read_table(master_path)?;
        info!(
            main_rows = main_raw.len(),
            master_rows = master_raw.len(),
            "输入读取完成"
        );

        // ==========================================
        // 步骤2-4: 富化主表
        // ==========================================
        let (table, resolution) = self.enrich(main_raw);

        // ==========================================
        // 步骤5: Master 合并生成汇总
        // ==========================================
        debug!("步骤5: Master 合并");
        let (summary, merge) = self.merger.merge(&table, &master_raw);

        // ==========================================
        // 步骤6: 导出报表
        // ==========================================
        debug!("步骤6: 导出报表");
        let sheet_names = self.exporter.export(&table, &summary, output_path)?;

        let report = ProcessingReport {
            run_id: run_id.to_string(),
            main_file: main_path.display().to_string(),
            master_file: master_path.display().to_string(),
            output_file: output_path.display().to_string(),
            total_records: table.len(),
            resolution,
            merge,
            sheet_names,
            started_at,
            elapsed_ms: timer.elapsed().as_millis(),
        };

        info!(
            run_id = %report.run_id,
            records = report.total_records,
            sheets = report.sheet_names.len(),
            elapsed_ms = report.elapsed_ms as u64,
            "处理完成"
        );

        Ok(report)
    }

    /// 主表富化（标准化 → 解析 → 默认值），不涉及文件读写
    pub fn enrich(&self, raw: RawTable) -> (SlaTable, ResolutionStats) {
        debug!("步骤2: 列名标准化");
        let mut table = self.normalizer.normalize(raw);

        debug!("步骤3: Hub/邮编解析");
        let resolution = self.resolver.resolve(&mut table);

        debug!("步骤4: 默认值覆写");
        self.defaulter.apply(&mut table);

        (table, resolution)
    }
}

impl Default for SlaPipeline {
    fn default() -> Self {
        Self::new(&PipelineConfig::default())
    }
}

/// 流水线入口（默认配置）
///
/// 读取主表与 Master 表，写出多工作表报表
pub fn process_workbooks(
    main_path: &Path,
    master_path: &Path,
    output_path: &Path,
) -> PipelineResult<ProcessingReport> {
    SlaPipeline::default().run(main_path, master_path, output_path)
}
