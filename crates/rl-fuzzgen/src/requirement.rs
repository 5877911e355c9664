//! Generates valid requirement-grammar source text (§4.2) from an
//! [`arbitrary::Unstructured`] byte stream, the way `apollo-smith`'s
//! `DocumentBuilder` generates valid GraphQL documents from the same kind of
//! input.

use arbitrary::{Result, Unstructured};

const MAX_DEPTH: u8 = 4;

const ITEM_NAMES: &[&str] = &[
    "Lamp", "Key", "Gem", "Sword", "Shield", "Bow", "Map", "Compass", "Small Key", "Boss Key",
    "Key 2", "Key 10",
];
const CATEGORY_NAMES: &[&str] = &["Weapons", "Keys", "Dungeon Items", "Upgrades"];
const YAML_OPTION_NAMES: &[&str] = &["hard_mode", "difficulty", "keysanity"];
const LOCATION_NAMES: &[&str] = &["Start", "Mid", "End", "Boss Room"];
const FUNCTION_NAMES: &[&str] = &[
    "YamlEnabled",
    "YamlDisabled",
    "YamlCompare",
    "OptOne",
    "OptAll",
    "ItemValue",
    "canReachLocation",
];

/// Builds one arbitrary requirement expression per instance, the way
/// `apollo_smith::DocumentBuilder` builds one document per instance.
pub struct RequirementBuilder<'a, 'b> {
    u: &'a mut Unstructured<'b>,
}

impl<'a, 'b> RequirementBuilder<'a, 'b> {
    pub fn new(u: &'a mut Unstructured<'b>) -> Self {
        Self { u }
    }

    /// A complete `expr` production (§4.2 grammar), bounded to `MAX_DEPTH`
    /// nested binary connectives so generation always terminates quickly.
    pub fn expr(&mut self) -> Result<String> {
        self.expr_at(MAX_DEPTH)
    }

    fn expr_at(&mut self, depth: u8) -> Result<String> {
        if depth == 0 || self.u.ratio(1, 3)? {
            return self.unary_at(depth);
        }
        let left = self.unary_at(depth.saturating_sub(1))?;
        let connective = if self.u.arbitrary::<bool>()? { "AND" } else { "OR" };
        let right = self.expr_at(depth - 1)?;
        Ok(format!("{left} {connective} {right}"))
    }

    fn unary_at(&mut self, depth: u8) -> Result<String> {
        if depth > 0 && self.u.ratio(1, 5)? {
            let inner = self.expr_at(depth - 1)?;
            return Ok(format!("({inner})"));
        }
        if self.u.arbitrary::<bool>()? {
            self.pipe_body()
        } else {
            self.function_body()
        }
    }

    fn pipe_body(&mut self) -> Result<String> {
        let is_category = self.u.arbitrary::<bool>()?;
        let at = if is_category { "@" } else { "" };
        let pool = if is_category { CATEGORY_NAMES } else { ITEM_NAMES };
        let name = self.pick(pool)?;
        let quantity = self.quantity()?;
        Ok(format!("|{at}{name}{quantity}|"))
    }

    fn quantity(&mut self) -> Result<String> {
        match self.u.int_in_range(0..=3u8)? {
            0 => Ok(String::new()),
            1 => Ok(":ALL".to_string()),
            2 => Ok(":HALF".to_string()),
            _ => {
                let n = self.u.int_in_range(1..=20u32)?;
                if self.u.arbitrary::<bool>()? {
                    Ok(format!(":{n}%"))
                } else {
                    Ok(format!(":{n}"))
                }
            }
        }
    }

    fn function_body(&mut self) -> Result<String> {
        let name = self.pick(FUNCTION_NAMES)?;
        let arg = match name.as_str() {
            "YamlEnabled" | "YamlDisabled" => self.pick(YAML_OPTION_NAMES)?,
            "YamlCompare" => {
                let opt = self.pick(YAML_OPTION_NAMES)?;
                let op = self.pick(&["==", "!=", ">=", "<=", "<", ">"])?;
                let literal = self.u.int_in_range(0..=5u32)?;
                format!("{opt} {op} {literal}")
            }
            "OptOne" | "ItemValue" => {
                let item = self.pick(ITEM_NAMES)?;
                let n = self.u.int_in_range(1..=9u32)?;
                format!("{item}:{n}")
            }
            "OptAll" => self.pipe_body()?,
            "canReachLocation" => self.pick(LOCATION_NAMES)?,
            other => unreachable!("FUNCTION_NAMES only lists generated names, got {other}"),
        };
        Ok(format!("{{{name}({arg})}}"))
    }

    fn pick(&mut self, pool: &[&str]) -> Result<String> {
        Ok((*self.u.choose(pool)?).to_string())
    }
}

/// Convenience entry point mirroring `apollo_smith::DocumentBuilder::new`
/// followed by `.finish()`.
pub fn requirement_source(u: &mut Unstructured<'_>) -> Result<String> {
    RequirementBuilder::new(u).expr()
}
