use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::models::{MealLineItem, MealSlot, PlanRecord, RecipeCard, SlotKind};

pub const DEFAULT_CALORIE_COLUMN: usize = 120;
pub const DEFAULT_BUDGET_LIMIT: usize = 7500;
pub const DEFAULT_BUDGET_CEILING: usize = 8000;

const CHECK: &str = "✓";
const WARNING: &str = "⚠";

/// Layout settings for the text report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// Character column where the calorie value starts.
    pub calorie_column: usize,
    pub bullet: String,
    /// Text between the bullet and the item name.
    pub item_indent: String,
    pub header_padding_lines: usize,
    pub blank_lines_after_title: usize,
    pub centering_width: usize,
    pub title: String,
    pub budget_limit: usize,
    pub budget_ceiling: usize,
    pub continuation_notice: String,
    pub footer: String,
    /// Date printed under the patient name; today when unset.
    pub date: Option<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            calorie_column: DEFAULT_CALORIE_COLUMN,
            bullet: "•".to_string(),
            item_indent: "   ".to_string(),
            header_padding_lines: 2,
            blank_lines_after_title: 2,
            centering_width: DEFAULT_CALORIE_COLUMN,
            title: "PLANO ALIMENTAR PERSONALIZADO".to_string(),
            budget_limit: DEFAULT_BUDGET_LIMIT,
            budget_ceiling: DEFAULT_BUDGET_CEILING,
            continuation_notice: "(Substituições e receitas continuam na próxima parte.)"
                .to_string(),
            footer: "Este plano alimentar é individual e confidencial. Não compartilhe nem \
                     utilize sem orientação do seu nutricionista."
                .to_string(),
            date: None,
        }
    }
}

impl FormatterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.budget_limit > self.budget_ceiling {
            return Err(PlanError::InvalidInput(format!(
                "budget limit {} exceeds ceiling {}",
                self.budget_limit, self.budget_ceiling
            )));
        }
        if self.calorie_column == 0 {
            return Err(PlanError::InvalidInput(
                "calorie column must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn date_text(&self) -> String {
        match &self.date {
            Some(date) => date.clone(),
            None => chrono::Local::now().format("%d/%m/%Y").to_string(),
        }
    }
}

/// Pad `prefix` so the calorie value starts at `column`, keeping at least one space.
pub fn align_calories(prefix: &str, kcal: f64, column: usize) -> String {
    let pad = column.saturating_sub(prefix.chars().count()).max(1);
    format!("{}{}{:.2} Kcal", prefix, " ".repeat(pad), kcal)
}

fn center(text: &str, width: usize) -> String {
    format!("{:^width$}", text, width = width)
        .trim_end()
        .to_string()
}

fn glyph(ok: bool) -> &'static str {
    if ok { CHECK } else { WARNING }
}

fn item_line(item: &MealLineItem, config: &FormatterConfig) -> String {
    let prefix = format!(
        "{}{}{} ({}: {})",
        config.bullet, config.item_indent, item.name, item.display_unit, item.display_quantity
    );
    align_calories(&prefix, item.calories, config.calorie_column)
}

fn header(record: &PlanRecord, config: &FormatterConfig) -> Vec<String> {
    let mut lines = vec![String::new(); config.header_padding_lines];
    lines.push(center(&config.title, config.centering_width));
    lines.push(center(&record.profile.name, config.centering_width));
    lines.push(center(&config.date_text(), config.centering_width));
    lines.extend(std::iter::repeat_n(String::new(), config.blank_lines_after_title));
    lines
}

fn diet_lines(record: &PlanRecord) -> Vec<String> {
    let goal = record.profile.goal;
    vec![
        format!("Dieta {}", goal.diet_type()),
        format!(
            "Objetivo: {} - {:.0} Kcal/dia",
            goal.label(),
            record.targets.total_kcal
        ),
    ]
}

fn slot_lines(slot: &MealSlot, config: &FormatterConfig) -> Vec<String> {
    let heading = format!("  {} - {}", slot.time, slot.kind.label());
    let mut lines = vec![
        String::new(),
        align_calories(&heading, slot.calories, config.calorie_column),
    ];
    lines.extend(slot.items.iter().map(|item| item_line(item, config)));
    lines
}

fn summary_lines(record: &PlanRecord) -> Vec<String> {
    let s = &record.summary;
    let t = &record.targets;
    let mut lines = vec![
        String::new(),
        "RESUMO NUTRICIONAL".to_string(),
        format!(
            "Calorias: {:.0} / {:.0} Kcal {}",
            s.calories,
            t.total_kcal,
            glyph(s.within_tolerance)
        ),
        format!(
            "Proteínas: {:.1} g (mínimo {:.1} g) {}",
            s.protein_g,
            t.protein_g,
            glyph(s.protein_g >= t.protein_g)
        ),
        format!(
            "Carboidratos: {:.1} g (máximo {:.1} g) {}",
            s.carbs_g,
            t.carbs_g,
            glyph(s.carbs_g <= t.carbs_g)
        ),
        format!(
            "Gorduras: {:.1} g (máximo {:.1} g) {}",
            s.fat_g,
            t.fat_g,
            glyph(s.fat_g <= t.fat_g)
        ),
        format!(
            "Fibras: {:.1} g (mínimo {:.1} g) {}",
            s.fiber_g,
            t.fiber_g,
            glyph(s.fiber_g >= t.fiber_g)
        ),
    ];
    if let Some(adj) = s.adjustment.as_ref().filter(|a| a.clamped) {
        lines.push(format!(
            "{} Ajuste calórico em {} limitado para manter proteína >= carboidrato",
            WARNING,
            adj.slot.label()
        ));
    }
    lines
}

fn substitution_lines(record: &PlanRecord) -> Vec<String> {
    if record.substitutions.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "SUBSTITUIÇÕES".to_string()];
    for subs in &record.substitutions {
        lines.push(String::new());
        lines.push(format!("{}:", subs.slot.label()));
        lines.extend(subs.lines.iter().map(|l| format!("- {}", l)));
    }
    lines
}

fn recipe_lines(recipes: &[RecipeCard], config: &FormatterConfig) -> Vec<String> {
    if recipes.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![String::new(), "RECEITAS".to_string()];
    let mut current: Option<SlotKind> = None;
    for card in recipes {
        if current != Some(card.slot) {
            lines.push(String::new());
            lines.push(format!("Opções para {}:", card.slot.label()));
            current = Some(card.slot);
        }
        lines.push(align_calories(&card.name, card.calories, config.calorie_column));
        lines.extend(card.items.iter().map(|item| item_line(item, config)));
    }
    lines
}

fn footer_lines(config: &FormatterConfig) -> Vec<String> {
    vec![String::new(), config.footer.clone()]
}

fn body_lines(record: &PlanRecord, config: &FormatterConfig) -> Vec<String> {
    let mut lines = header(record, config);
    lines.extend(diet_lines(record));
    for slot in &record.slots {
        lines.extend(slot_lines(slot, config));
    }
    lines.extend(summary_lines(record));
    lines
}

/// The full report: essential content, appendices and footer.
pub fn render_report(record: &PlanRecord, config: &FormatterConfig) -> String {
    let mut lines = body_lines(record, config);
    lines.extend(substitution_lines(record));
    lines.extend(recipe_lines(&record.recipes, config));
    lines.extend(footer_lines(config));
    lines.join("\n")
}

/// Header, diet, slots and summary, closed by the continuation notice.
pub fn render_essential(record: &PlanRecord, config: &FormatterConfig) -> String {
    let mut lines = body_lines(record, config);
    lines.push(String::new());
    lines.push(config.continuation_notice.clone());
    lines.join("\n")
}

/// Substitution and recipe appendices with the footer.
pub fn render_continuation(record: &PlanRecord, config: &FormatterConfig) -> String {
    let mut lines = substitution_lines(record);
    lines.extend(recipe_lines(&record.recipes, config));
    lines.extend(footer_lines(config));
    let text = lines.join("\n");
    text.trim_start_matches('\n').to_string()
}
