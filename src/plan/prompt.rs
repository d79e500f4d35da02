//! Prompt text sent to the completion model.

pub const SYSTEM_PROMPT: &str = r##"你是一位专业的成都聚会规划师，专门为18-30岁的年轻用户设计聚会方案。

请根据用户选择的标签，生成2个完全不同的聚会方案。每个方案必须包含以下内容：

1. 诱人标题：要有诗意和吸引力，体现成都特色
2. 诱惑文案：描述方案的核心亮点和体验感受
3. 详细流程：具体的时间安排和活动内容
4. 核心标签：3-4个相关标签
5. 关键信息：预计时长、人均消费、交通便利度

要求：
- 方案要真实可行，符合成都实际情况
- 文案要有感染力，能激发用户兴趣
- 时间安排要合理，考虑交通和活动时长
- 消费水平要适中，适合年轻人
- 每个方案都要有独特的亮点

请以JSON格式返回，格式如下：
{
  "plans": [
    {
      "title": "方案标题",
      "image": "对应的图片路径",
      "tags": ["#标签1", "#标签2", "#标签3"],
      "description": "方案描述文案",
      "duration": "预计时长",
      "budget": "人均消费",
      "transport": "交通便利度",
      "timeline": [
        {"time": "时间", "activity": "活动内容"}
      ]
    }
  ]
}"##;

const PLAIN_INSTRUCTION: &str = "请根据这些标签，生成2个完全不同的成都聚会方案。";
const GROUNDED_INSTRUCTION: &str = "请基于以上小红书用户的真实分享和推荐，结合用户选择的标签，生成2个完全不同的成都聚会方案。确保推荐的地点、消费信息、体验感受等都基于真实用户反馈。";

/// User message for plan generation. `search` is the text returned by the
/// note search, when one succeeded.
pub fn user_prompt(tags: &[String], search: Option<&str>) -> String {
    let joined = tags.join("、");
    match search.map(str::trim).filter(|s| !s.is_empty()) {
        Some(info) => {
            format!(
                "用户选择的标签：{joined}\n\n小红书相关推荐信息：\n{info}\n\n{GROUNDED_INSTRUCTION}"
            )
        }
        None => format!("用户选择的标签：{joined}\n\n{PLAIN_INSTRUCTION}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags() -> Vec<String> {
        vec!["美食".to_string(), "复古".to_string()]
    }

    #[test]
    fn plain_prompt_without_search() {
        assert_eq!(
            user_prompt(&tags(), None),
            "用户选择的标签：美食、复古\n\n请根据这些标签，生成2个完全不同的成都聚会方案。"
        );
    }

    #[test]
    fn blank_search_text_counts_as_absent() {
        assert_eq!(user_prompt(&tags(), Some("  \n")), user_prompt(&tags(), None));
    }

    #[test]
    fn search_text_is_embedded() {
        let prompt = user_prompt(&tags(), Some("玉林路有家小酒馆"));
        let head = "用户选择的标签：美食、复古\n\n小红书相关推荐信息：\n玉林路有家小酒馆\n\n";
        assert!(prompt.starts_with(head));
        assert!(prompt.ends_with(GROUNDED_INSTRUCTION));
    }

    #[test]
    fn system_prompt_asks_for_plan_schema() {
        assert!(SYSTEM_PROMPT.contains("\"plans\""));
        assert!(SYSTEM_PROMPT.contains("\"timeline\""));
        assert!(SYSTEM_PROMPT.contains(r##""tags": ["#标签1", "#标签2", "#标签3"]"##));
        assert!(SYSTEM_PROMPT.ends_with("  ]\n}"));
    }
}
