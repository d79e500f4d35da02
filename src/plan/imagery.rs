//! Image asset selection and image-generation prompts.
//!
//! Asset selection is a pure, order-sensitive lookup over [`ImageCatalog`]:
//! text keywords first, then the plan's own tags, then the caller's tags,
//! then a constant fallback.

use serde::Deserialize;

/// Maps a keyword or tag to a bundled image asset.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AssetRule {
    pub keyword: String,
    pub asset: String,
}

impl AssetRule {
    fn new(keyword: &str, asset: &str) -> Self {
        Self {
            keyword: keyword.to_string(),
            asset: asset.to_string(),
        }
    }
}

/// Ordered lookup tables for choosing a plan image. Table order is precedence order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageCatalog {
    /// Matched as substrings of the plan title or description.
    #[serde(default = "default_keyword_rules")]
    pub keywords: Vec<AssetRule>,

    /// Matched exactly against tags, with any leading `#` removed.
    #[serde(default = "default_tag_rules")]
    pub tags: Vec<AssetRule>,

    #[serde(default = "default_fallback")]
    pub fallback: String,
}

fn default_keyword_rules() -> Vec<AssetRule> {
    vec![
        AssetRule::new("玉林路", "/chengdu-yulin-road-vintage-bar.png"),
        AssetRule::new("太古里", "/chengdu-taikoo-li-art.png"),
        AssetRule::new("宽窄巷子", "/chengdu-teahouse.png"),
        AssetRule::new("茶馆", "/chengdu-teahouse.png"),
        AssetRule::new("美术馆", "/chengdu-taikoo-li-art-gallery.png"),
        AssetRule::new("画廊", "/chengdu-taikoo-li-art-gallery.png"),
        AssetRule::new("酒吧", "/chengdu-yulin-bar.png"),
        AssetRule::new("酒馆", "/chengdu-yulin-bar.png"),
        AssetRule::new("咖啡", "/chengdu-street-cafe.png"),
    ]
}

fn default_tag_rules() -> Vec<AssetRule> {
    vec![
        AssetRule::new("美食", "/chengdu-street-cafe.png"),
        AssetRule::new("艺术", "/chengdu-taikoo-li-art.png"),
        AssetRule::new("夜生活", "/chengdu-yulin-bar.png"),
        AssetRule::new("文化", "/chengdu-teahouse.png"),
        AssetRule::new("现代", "/chengdu-taikoo-li-art-gallery.png"),
        AssetRule::new("复古", "/chengdu-yulin-road-vintage-bar.png"),
    ]
}

fn default_fallback() -> String {
    "/placeholder.jpg".to_string()
}

impl Default for ImageCatalog {
    fn default() -> Self {
        Self {
            keywords: default_keyword_rules(),
            tags: default_tag_rules(),
            fallback: default_fallback(),
        }
    }
}

impl ImageCatalog {
    /// Choose the asset for a plan.
    pub fn select(
        &self,
        title: &str,
        description: &str,
        plan_tags: &[String],
        caller_tags: &[String],
    ) -> &str {
        if let Some(rule) = self
            .keywords
            .iter()
            .find(|rule| title.contains(&rule.keyword) || description.contains(&rule.keyword))
        {
            return &rule.asset;
        }

        self.match_tags(plan_tags)
            .or_else(|| self.match_tags(caller_tags))
            .unwrap_or(self.fallback.as_str())
    }

    /// Asset for the first tag, in the given order, that has a rule.
    fn match_tags(&self, tags: &[String]) -> Option<&str> {
        tags.iter().find_map(|tag| {
            let bare = tag.trim().trim_start_matches('#');
            self.tags
                .iter()
                .find(|rule| rule.keyword == bare)
                .map(|rule| rule.asset.as_str())
        })
    }

    /// Whether `path` is one of the assets this catalog can hand out.
    pub fn is_known_asset(&self, path: &str) -> bool {
        path == self.fallback
            || self
                .keywords
                .iter()
                .chain(self.tags.iter())
                .any(|rule| rule.asset == path)
    }
}

const IMAGE_PROMPT_BASE: &str = "成都, 高质量, 现代摄影风格, 4K分辨率, 非人像, 背景图, 无文字";
const IMAGE_PROMPT_SUFFIX: &str = ", 聚会场景, 年轻人, 时尚, 精美构图";

const TAG_DESCRIPTORS: &[(&str, &str)] = &[
    ("美食", ", 美食场景, 餐厅环境"),
    ("艺术", ", 艺术氛围, 画廊空间"),
    ("夜生活", ", 夜晚场景, 酒吧环境"),
    ("文化", ", 传统文化, 茶馆环境"),
    ("现代", ", 现代建筑, 都市风格"),
    ("复古", ", 复古风格, 怀旧氛围"),
    ("浪漫", ", 浪漫氛围, 温馨环境"),
    ("文艺", ", 文艺气息, 创意空间"),
];

const TITLE_DESCRIPTORS: &[(&str, &str)] = &[
    ("玉林路", ", 玉林路街道, 成都特色街区"),
    ("太古里", ", 太古里商圈, 现代商业区"),
    ("宽窄巷子", ", 宽窄巷子, 传统街区"),
    ("慢生活", ", 悠闲生活, 慢节奏"),
];

/// Prompt for the image generator: base style, then caller-tag descriptors
/// in table order, then title descriptors in table order.
pub fn image_prompt(title: &str, caller_tags: &[String]) -> String {
    let mut prompt = String::from(IMAGE_PROMPT_BASE);

    for (tag, descriptor) in TAG_DESCRIPTORS {
        if caller_tags.iter().any(|t| t == tag) {
            prompt.push_str(descriptor);
        }
    }
    for (keyword, descriptor) in TITLE_DESCRIPTORS {
        if title.contains(keyword) {
            prompt.push_str(descriptor);
        }
    }

    prompt.push_str(IMAGE_PROMPT_SUFFIX);
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn title_keyword_beats_caller_tags() {
        let catalog = ImageCatalog::default();
        let asset = catalog.select(
            "在玉林路的尽头，寻找成都的慢生活",
            "",
            &[],
            &tags(&["美食", "艺术"]),
        );
        assert_eq!(asset, "/chengdu-yulin-road-vintage-bar.png");
    }

    #[test]
    fn keyword_table_order_wins_over_text_order() {
        let catalog = ImageCatalog::default();
        // "咖啡" appears first in the text, but "太古里" is earlier in the table.
        let asset = catalog.select("咖啡与太古里", "", &[], &[]);
        assert_eq!(asset, "/chengdu-taikoo-li-art.png");
    }

    #[test]
    fn description_keywords_are_checked() {
        let catalog = ImageCatalog::default();
        let asset = catalog.select("周末计划", "先去宽窄巷子喝茶", &[], &[]);
        assert_eq!(asset, "/chengdu-teahouse.png");
    }

    #[test]
    fn plan_tags_beat_caller_tags() {
        let catalog = ImageCatalog::default();
        let asset = catalog.select(
            "周末计划",
            "",
            &tags(&["#微醺", "#复古"]),
            &tags(&["美食"]),
        );
        assert_eq!(asset, "/chengdu-yulin-road-vintage-bar.png");
    }

    #[test]
    fn caller_tags_in_caller_order() {
        let catalog = ImageCatalog::default();
        let caller = tags(&["浪漫", "文化", "美食"]);
        let asset = catalog.select("周末计划", "", &tags(&["#成都"]), &caller);
        assert_eq!(asset, "/chengdu-teahouse.png");
    }

    #[test]
    fn falls_back_to_placeholder() {
        let catalog = ImageCatalog::default();
        assert_eq!(
            catalog.select("周末计划", "随便走走", &tags(&["#成都"]), &tags(&["浪漫"])),
            "/placeholder.jpg"
        );
    }

    #[test]
    fn known_assets() {
        let catalog = ImageCatalog::default();
        assert!(catalog.is_known_asset("/chengdu-teahouse.png"));
        assert!(catalog.is_known_asset("/placeholder.jpg"));
        assert!(!catalog.is_known_asset("/images/plan1.jpg"));
    }

    #[test]
    fn catalog_from_toml_keeps_order() {
        let catalog: ImageCatalog = toml::from_str(
            r#"
            fallback = "/default.png"

            [[keywords]]
            keyword = "火锅"
            asset = "/hotpot.png"

            [[keywords]]
            keyword = "玉林路"
            asset = "/yulin.png"
        "#,
        )
        .unwrap();

        assert_eq!(catalog.select("玉林路火锅", "", &[], &[]), "/hotpot.png");
        // Tag rules fall back to the built-in table when not overridden.
        assert_eq!(catalog.tags, default_tag_rules());
        assert_eq!(catalog.select("x", "", &[], &[]), "/default.png");
    }

    #[test]
    fn image_prompt_adds_descriptors_in_table_order() {
        let prompt = image_prompt("玉林路的慢生活", &tags(&["复古", "美食"]));
        assert_eq!(
            prompt,
            "成都, 高质量, 现代摄影风格, 4K分辨率, 非人像, 背景图, 无文字\
             , 美食场景, 餐厅环境, 复古风格, 怀旧氛围\
             , 玉林路街道, 成都特色街区, 悠闲生活, 慢节奏\
             , 聚会场景, 年轻人, 时尚, 精美构图"
        );
    }

    #[test]
    fn image_prompt_without_matches() {
        let prompt = image_prompt("周末", &[]);
        assert_eq!(
            prompt,
            format!("{IMAGE_PROMPT_BASE}{IMAGE_PROMPT_SUFFIX}")
        );
    }
}
