// ==========================================
// SLA Hub 报表系统 - 原子落盘
// ==========================================
// 流程: 同目录临时文件 → 写入 → flush + sync_all → rename 覆盖目标
// 红线: 写入失败时目标文件保持原状（不存在半成品）
// ==========================================

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

fn parent_dir_or_dot(path: &Path) -> &Path {
    // 裸文件名的 parent 为 ""，按当前目录处理
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

/// 原子写入完整字节
pub fn atomic_write_bytes(dest: impl AsRef<Path>, bytes: &[u8]) -> io::Result<()> {
    let dest = dest.as_ref();
    let dir = parent_dir_or_dot(dest);
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file_mut().flush()?;
    tmp.as_file().sync_all()?;

    tmp.persist(dest).map_err(|e| e.error)?;

    // 目录元数据同步失败不影响结果（文件已就位）
    let _ = File::open(dir).and_then(|d| d.sync_all());

    Ok(())
}
