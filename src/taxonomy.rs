//! Static two-level tag taxonomy and the domain color table.
//!
//! The taxonomy seeds the tag store on first open. Each entry is a
//! top-level category followed by its leaf tags.

use crate::TagType;

/// A top-level category and its leaf tags.
pub type TaxonomyEntry = (&'static str, &'static [&'static str]);

/// Domain categories ("what field").
pub const DOMAIN_TAXONOMY: &[TaxonomyEntry] = &[
    ("心理学", &["认知心理", "社会心理", "动机与习惯", "心理测量"]),
    ("经济学", &["微观", "宏观", "行为经济学", "计量/实验"]),
    ("数学", &["分析", "代数", "概率统计", "离散数学", "优化"]),
    (
        "计算机",
        &[
            "算法与数据结构",
            "操作系统",
            "计算机网络",
            "数据库",
            "机器学习/深度学习",
            "编译原理",
            "软件工程",
        ],
    ),
    ("数据科学", &["统计学习", "可视化", "实验设计"]),
    ("哲学", &["认识论", "伦理学", "科学哲学"]),
    ("历史", &["通史", "专题史"]),
    ("文学", &["小说", "散文", "批评"]),
    ("社会学", &["制度", "组织", "方法"]),
];

/// Theme categories ("why/how it applies").
pub const THEME_TAXONOMY: &[TaxonomyEntry] = &[
    ("思维提升", &["批判性思维", "概率思维", "系统思维", "因果推断"]),
    ("决策", &["启发式与偏差", "风险与不确定性", "博弈/机制"]),
    ("学习方法", &["记忆/笔记", "元认知", "科研方法"]),
    ("自我管理", &["目标与执行", "习惯养成", "时间管理", "专注与成瘾"]),
    ("职业技能", &["编程实践", "代码质量/重构", "架构", "写作表达"]),
    ("世界认知", &["经济运行", "技术与社会", "历史视角"]),
    ("工程实践", &["性能与可靠性", "实验与评估", "系统理解"]),
    ("伦理与社会影响", &["AI伦理", "隐私", "公共政策"]),
];

/// Category used for books with no domain tag.
pub const FALLBACK_DOMAIN: &str = "其他";

const FALLBACK_COLOR: &str = "#95A5A6";

const DOMAIN_COLORS: &[(&str, &str)] = &[
    ("心理学", "#FF6B6B"),
    ("经济学", "#4ECDC4"),
    ("数学", "#45B7D1"),
    ("计算机", "#96CEB4"),
    ("数据科学", "#FFEAA7"),
    ("哲学", "#DDA0DD"),
    ("历史", "#98D8C8"),
    ("文学", "#F7DC6F"),
    ("社会学", "#BB8FCE"),
    (FALLBACK_DOMAIN, FALLBACK_COLOR),
];

/// Returns the taxonomy for one tag dimension.
pub fn taxonomy(tag_type: TagType) -> &'static [TaxonomyEntry] {
    match tag_type {
        TagType::Domain => DOMAIN_TAXONOMY,
        TagType::Theme => THEME_TAXONOMY,
    }
}

/// Looks up the display color for a domain name.
///
/// Unmapped names, leaf tags and the empty string share the fallback color.
///
/// # Examples
///
/// ```
/// use shelf::taxonomy::domain_color;
///
/// assert_eq!(domain_color("心理学"), "#FF6B6B");
/// assert_eq!(domain_color("unknown"), "#95A5A6");
/// ```
pub fn domain_color(domain: &str) -> &'static str {
    DOMAIN_COLORS
        .iter()
        .find(|(name, _)| *name == domain)
        .map(|(_, color)| *color)
        .unwrap_or(FALLBACK_COLOR)
}
