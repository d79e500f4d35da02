//! Interface de terminal do dateplan: spinner de carregamento e cartões de plano.
//!
//! Usa `indicatif` para o spinner e `console` para estilização com cores.

use std::time::Duration;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

use crate::plan::NormalizedPlan;

/// Textos exibidos em rotação enquanto os planos são gerados.
pub const LOADING_TEXTS: [&str; 4] = [
    "正在唤醒成都的文艺基因...",
    "为你匹配最搭的 BGM...",
    "寻找隐藏的宝藏地点...",
    "灵感即将抵达！",
];

const ROTATE_EVERY: Duration = Duration::from_millis(1500);

/// Texto de carregamento para o passo `step`, em ciclo.
pub fn loading_text(step: usize) -> &'static str {
    LOADING_TEXTS[step % LOADING_TEXTS.len()]
}

/// Spinner que alterna os textos de carregamento até ser finalizado.
pub struct GenerationProgress {
    pb: ProgressBar,
    rotator: JoinHandle<()>,
    green: Style,
    red: Style,
}

impl GenerationProgress {
    /// Inicia o spinner. Precisa rodar dentro de um runtime tokio.
    pub fn start() -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.magenta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(loading_text(0));
        pb.enable_steady_tick(Duration::from_millis(100));

        let rotator = tokio::spawn({
            let pb = pb.clone();
            async move {
                let mut interval = tokio::time::interval(ROTATE_EVERY);
                interval.tick().await;
                for step in 1.. {
                    interval.tick().await;
                    pb.set_message(loading_text(step));
                }
            }
        });

        Self {
            pb,
            rotator,
            green: Style::new().green().bold(),
            red: Style::new().red().bold(),
        }
    }

    /// Para o spinner e informa quantos planos foram gerados.
    pub fn finish(self, count: usize) {
        self.rotator.abort();
        self.pb.finish_and_clear();
        println!("  {} 为你生成了 {count} 个方案", self.green.apply_to("✓"));
    }

    /// Para o spinner e exibe a mensagem de erro em vermelho.
    pub fn fail(self, message: &str) {
        self.rotator.abort();
        self.pb.finish_and_clear();
        eprintln!("  {} {message}", self.red.apply_to("✗"));
    }
}

/// Renderiza um plano como um cartão de texto.
pub fn render_card(plan: &NormalizedPlan) -> String {
    let title = Style::new().cyan().bold();
    let tag = Style::new().magenta();
    let dim = Style::new().dim();

    let mut out = String::new();
    let id = format!("#{}", plan.id);
    out.push_str(&format!("{} {}\n", dim.apply_to(id), title.apply_to(&plan.title)));
    out.push_str(&format!("  {}\n", tag.apply_to(plan.tags.join(" "))));
    out.push_str(&format!("  {}\n", plan.description));
    out.push_str(&format!(
        "  ⏱ {}   💰 {}   🚇 {}\n",
        plan.duration, plan.budget, plan.transport
    ));
    for step in &plan.timeline {
        out.push_str(&format!("    {}  {}\n", dim.apply_to(&step.time), step.activity));
    }
    out.push_str(&format!("  {}\n", dim.apply_to(&plan.image)));
    out
}

/// Imprime todos os planos como cartões, separados por uma linha em branco.
pub fn print_plans(plans: &[NormalizedPlan]) {
    for plan in plans {
        println!();
        print!("{}", render_card(plan));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::TimelineEntry;

    #[test]
    fn loading_texts_cycle() {
        assert_eq!(loading_text(0), "正在唤醒成都的文艺基因...");
        assert_eq!(loading_text(3), "灵感即将抵达！");
        assert_eq!(loading_text(4), loading_text(0));
    }

    #[test]
    fn card_shows_every_field() {
        console::set_colors_enabled(false);
        let plan = NormalizedPlan {
            id: 2,
            title: "玉林路的微醺夜晚".into(),
            image: "/chengdu-yulin-bar.png".into(),
            tags: vec!["#复古".into(), "#夜生活".into()],
            description: "小酒馆里的民谣".into(),
            duration: "3小时".into(),
            budget: "¥120".into(),
            transport: "地铁2号线".into(),
            timeline: vec![TimelineEntry {
                time: "20:00-21:00".into(),
                activity: "听民谣".into(),
            }],
            image_expires_at: None,
        };

        let card = render_card(&plan);
        assert!(card.starts_with("#2 玉林路的微醺夜晚\n"));
        assert!(card.contains("#复古 #夜生活"));
        assert!(card.contains("⏱ 3小时   💰 ¥120   🚇 地铁2号线"));
        assert!(card.contains("    20:00-21:00  听民谣\n"));
        assert!(card.ends_with("  /chengdu-yulin-bar.png\n"));
    }
}
