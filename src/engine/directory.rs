// ==========================================
// SLA Hub 报表系统 - 静态目录表
// ==========================================
// 职责: Hub 名称 → Hub 代码 / 站点编号 → 始发邮编
// 红线: 进程内只读，首次访问时构建，不支持热更新
// 说明: 多个名称映射到同一代码是已核实的业务事实，不得去重
// ==========================================

use std::collections::HashMap;
use std::sync::OnceLock;

/// Hub 名称（TRIM + UPPER 后）→ Hub 代码
const FACILITY_ENTRIES: &[(&str, i64)] = &[
    ("COLUMBUS_FEDEX", 380),
    ("COLUMBUS_UPS", 614),
    ("CHICAGO_EARLY", 171),
    ("CHICAGO_LATE", 191),
    ("CCHIL_N", 290),
    ("CCHIL_T", 292),
    ("ROADIE_CHICAGO", 295),
    ("EARLY_LOCAL", 180),
    ("LATE_LOCAL", 220),
    ("DALLAS_UPS_EARLY", 170),
    ("DALLAS_UPS_LATE", 219),
    ("ROADIE_DALLAS", 120),
    ("BALTIMORE_FEDEX", 231),
    ("BALTIMORE_UPS", 230),
    ("ROADIE_BALTIMORE", 235),
    ("FEDEX_HOUSTON", 211),
    ("ROADIE_HOUSTON", 215),
    ("UPS_HOUSTON", 210),
    ("LACEY_ONTRAC", 400),
    ("LACEY_FEDEX", 600),
    ("LACEY_UPS", 500),
    ("MIAMI_FEDEX", 305),
    ("MIAMI_UPS", 954),
    ("ROADIE_MIAMI", 970),
    ("NEWARK_FEDEX_HOT", 661),
    ("NEWARK_UPS_BAYN", 662),
    ("ROADIE_NEWARK", 664),
    ("TAMPA_FEDEX", 813),
    ("TAMPA_FEDEX_OCAL", 815),
    ("ROADIE_ORLANDO", 819),
    ("ROADIE_TAMPABAY", 820),
    ("TAMPA_UPS", 812),
    ("TRACY_ONTRAC", 526),
    ("TRACY_FEDEX", 524),
    ("ROADIE_SANFRAN", 530),
    ("TRACY_UPS", 528),
    ("ATLANTA_FEDEX", 123),
    ("BOSTON_FEDEX", 176),
    ("BOSTON_UPS", 341),
    ("BOSTON_UPS_T", 342),
    ("FEDEX_LOCAL", 17),
    ("FEDEX_LOCAL_COLUMBIA", 118),
    ("EARTH_CITY_MO_T", 1),
    ("ONTRAC_D", 3),
    ("RIALTO_LATE", 111),
    ("ONTARIO HUB", 112),
    ("ONTRAC_N", 5),
    ("ONTARIO HUB_CA_D", 2),
    ("ROADIE_SANDIEGO", 115),
    ("ROADIE_SOUTHLA", 110),
    ("ELLENWOOD_EARLY", 19),
    ("ELLENWOOD_LATE", 20),
    ("ONTRAC_LOCAL", 301),
    ("ONTRAC_LTSC", 302),
    ("LOCAL", 9),
    ("ROADIE_TROY_DET", 104),
    ("HAGERSTOWN", 17),
    ("GAITHERSBURG", 1),
    ("ROADIE_HAGERSTOWN", 107),
    ("ROADIE_LGMAIN", 100),
    ("SMAGA", 1),
    ("SMAGA_N", 1),
    ("CACH", 1),
    ("NBLOH", 2),
];

/// 站点编号 → 始发邮编
const POSTAL_ENTRIES: &[(i64, i64)] = &[
    (5854, 8861),
    (5820, 60164),
    (6006, 92571),
    (6007, 92570),
    (5855, 33566),
    (5857, 95377),
    (6707, 43443),
    (5829, 21219),
    (5882, 1876),
    (5523, 43162),
    (5823, 75211),
    (6760, 21740),
    (5831, 77064),
    (5832, 98516),
    (6705, 30248),
    (6777, 30248),
    (5938, 65265),
    (5841, 33018),
    (5860, 30344),
];

// ==========================================
// FacilityDirectory - Hub 名称目录
// ==========================================
pub struct FacilityDirectory {
    entries: HashMap<&'static str, i64>,
}

impl FacilityDirectory {
    /// 全局只读实例
    pub fn global() -> &'static FacilityDirectory {
        static INSTANCE: OnceLock<FacilityDirectory> = OnceLock::new();
        INSTANCE.get_or_init(|| FacilityDirectory {
            entries: FACILITY_ENTRIES.iter().copied().collect(),
        })
    }

    /// 查询 Hub 代码（先 TRIM 再 UPPER，精确匹配）
    pub fn lookup(&self, name: &str) -> Option<i64> {
        let key = name.trim().to_uppercase();
        self.entries.get(key.as_str()).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ==========================================
// PostalDirectory - 站点邮编目录
// ==========================================
pub struct PostalDirectory {
    entries: HashMap<i64, i64>,
}

impl PostalDirectory {
    /// 全局只读实例
    pub fn global() -> &'static PostalDirectory {
        static INSTANCE: OnceLock<PostalDirectory> = OnceLock::new();
        INSTANCE.get_or_init(|| PostalDirectory {
            entries: POSTAL_ENTRIES.iter().copied().collect(),
        })
    }

    pub fn lookup(&self, loc_nbr: i64) -> Option<i64> {
        self.entries.get(&loc_nbr).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
