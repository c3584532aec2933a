//! 静的ルックアップテーブル
//!
//! ファイル名・キーワードを短く保つための辞書データ:
//! - 略語辞書（長い単語 → 短縮形）
//! - 同義語辞書（単語 → 言い換え候補）
//! - ストップワード・CTAフレーズ・用途/対象者の固定語彙
//!
//! 内部順序に依存するロジックは存在しない。

/// 略語辞書（キーは小文字）
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("abstract", "Abstr"),
    ("illustration", "Illust"),
    ("painting", "Paint"),
    ("digital", "Dig"),
    ("art", "Art"),
    ("commercial", "Com"),
    ("advertising", "Adv"),
    ("marketing", "Mkt"),
    ("editorial", "Edit"),
    ("social media", "Social"),
    ("web design", "Web"),
    ("creative", "Cre"),
    ("artists", "Art"),
    ("designers", "Des"),
    ("marketers", "Mkt"),
    ("editors", "Edit"),
    ("content creators", "Cont"),
    ("small business", "SmallBiz"),
    ("image", "Img"),
    ("fantasy", "Fant"),
    ("realistic", "Real"),
    ("portrait", "Port"),
    ("landscape", "Land"),
    ("unique", "Uniq"),
    ("original", "Orig"),
    ("impactful", "Imp"),
    ("eye-catching", "Eye"),
    ("exclusive", "Excl"),
    ("menacing", "Menac"),
    ("heroic", "Hero"),
    ("stylized", "Styl"),
    ("detailed", "Deta"),
    ("evocative", "Evoc"),
    ("striking", "Stri"),
];

/// 同義語辞書（キーは小文字、ヒット時は候補で置換する）
pub const SYNONYMS: &[(&str, &[&str])] = &[
    ("helmet", &["headgear", "casque", "helm", "yelmo"]),
    ("mask", &["face covering", "disguise", "visage", "máscara"]),
    ("eyes", &["optics", "orbs", "peepers", "ojos"]),
    ("horns", &["antlers", "protrusions", "spikes", "cuernos"]),
    ("illustration", &["artwork", "drawing", "depiction", "ilustración"]),
    ("knight", &["warrior", "cavalier", "caballero"]),
    ("portrait", &["image", "likeness", "representation", "retrato"]),
    ("landscape", &["scenery", "view", "vista", "paisaje"]),
    ("design", &["composition", "layout", "arte", "diseño"]),
    ("abstract", &["non-representational", "conceptual", "simbólico", "abstracto"]),
    ("unique", &["original", "distinctive", "singular", "exclusivo"]),
    ("original", &["unique", "novel", "fresh", "auténtico"]),
    ("impactful", &["striking", "powerful", "impressive", "conmovedor"]),
    ("eye-catching", &["arresting", "noticeable", "standout", "llamativo"]),
    ("exclusive", &["limited", "rare", "one-of-a-kind", "exclusivo"]),
];

/// キーワード集合から除外する単語
pub const STOP_WORDS: &[&str] = &["a", "an", "the", "of", "and", "for", "with", "in", "on", "to"];

/// タイトル末尾に付けるCTAフレーズ
pub const CALL_TO_ACTION: &[&str] = &[
    "Perfect for your next creative project.",
    "Ideal for capturing the attention of your audience.",
    "Elevate your content with this impactful visual.",
    "Use it to make a statement.",
];

/// 用途判定の固定語彙
pub const USE_CASE_VOCAB: &[&str] = &[
    "Commercial",
    "Advertising",
    "Marketing",
    "Editorial",
    "SocialMedia",
    "WebDesign",
    "Creative",
];

/// 対象者判定の固定語彙
pub const AUDIENCE_VOCAB: &[&str] = &[
    "Artists",
    "Designers",
    "Marketers",
    "Editors",
    "ContentCreators",
    "SmallBusiness",
];
