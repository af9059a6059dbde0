use crate::models::{FoodCategory, MealLineItem, MealSlot, SlotKind, SlotSubstitutions};
use crate::planner::assembler::PlannerConfig;

/// Category sentence plus the name fragments that also select it.
struct CategoryRule {
    category: FoodCategory,
    keywords: &'static [&'static str],
    sentence: &'static str,
}

/// Main-meal substitutions, emitted in this order.
const CATEGORY_RULES: [CategoryRule; 5] = [
    CategoryRule {
        category: FoodCategory::Protein,
        keywords: &["frango", "patinho", "tilápia", "carne", "peixe", "ovo"],
        sentence: "Proteína: troque por peixe branco, patinho, lombo suíno ou ovos na mesma quantidade.",
    },
    CategoryRule {
        category: FoodCategory::Carbohydrate,
        keywords: &["arroz", "batata", "pão", "tapioca", "aveia", "mandioca"],
        sentence: "Carboidrato: troque por arroz, batata-doce, mandioca, macarrão integral ou cuscuz na mesma quantidade.",
    },
    CategoryRule {
        category: FoodCategory::Legume,
        keywords: &["feijão", "lentilha", "grão-de-bico", "ervilha"],
        sentence: "Leguminosa: troque por lentilha, grão-de-bico, ervilha ou feijão preto na mesma quantidade.",
    },
    CategoryRule {
        category: FoodCategory::Fruit,
        keywords: &["banana", "mamão", "maçã", "morango", "laranja"],
        sentence: "Fruta: troque por maçã, pera, laranja, melão ou kiwi em porção equivalente.",
    },
    CategoryRule {
        category: FoodCategory::Vegetable,
        keywords: &["brócolis", "salada", "cenoura", "abobrinha", "couve"],
        sentence: "Vegetais: varie livremente entre folhas, brócolis, abobrinha, couve-flor e cenoura.",
    },
];

const BREAD_SENTENCE: &str =
    "Pão integral: pode ser trocado por tapioca (2 colheres de sopa de goma) ou cuscuz (100 g).";
const POWDER_SENTENCE: &str =
    "Whey protein: na falta, use 3 claras de ovo ou 100 g de iogurte natural desnatado por scoop.";
const FRUIT_SENTENCE: &str =
    "Frutas: banana, maçã, pera, mamão, morango ou uva em porção equivalente.";

fn item_matches(item: &MealLineItem, rule: &CategoryRule) -> bool {
    if item.category == rule.category {
        return true;
    }
    let name = item.name.to_lowercase();
    rule.keywords.iter().any(|k| name.contains(k))
}

fn main_meal_lines(slot: &MealSlot) -> Vec<String> {
    CATEGORY_RULES
        .iter()
        .filter(|rule| slot.items.iter().any(|item| item_matches(item, rule)))
        .map(|rule| rule.sentence.to_string())
        .collect()
}

fn snack_lines(slot: &MealSlot, powder_id: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut push = |sentence: &str| {
        if !lines.iter().any(|l| l == sentence) {
            lines.push(sentence.to_string());
        }
    };

    for item in &slot.items {
        let name = item.name.to_lowercase();
        if name.contains("pão") {
            push(BREAD_SENTENCE);
        } else if item.food_id.eq_ignore_ascii_case(powder_id) {
            push(POWDER_SENTENCE);
        } else if item.category == FoodCategory::Fruit {
            push(FRUIT_SENTENCE);
        }
    }
    lines
}

/// Substitution sentences for every slot that has any.
///
/// Pre-workout is left out; it is a single supplement line.
pub fn build_substitutions(slots: &[MealSlot], config: &PlannerConfig) -> Vec<SlotSubstitutions> {
    slots
        .iter()
        .filter(|s| s.kind != SlotKind::PreWorkout)
        .filter_map(|slot| {
            let lines = if slot.kind.is_main_meal() {
                main_meal_lines(slot)
            } else {
                snack_lines(slot, &config.protein_powder_id)
            };
            (!lines.is_empty()).then(|| SlotSubstitutions {
                slot: slot.kind,
                lines,
            })
        })
        .collect()
}
