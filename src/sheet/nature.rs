use super::stats::StatKey;

/// The stat a nature raises and the one it lowers
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NatureModifier {
    pub increased: Option<StatKey>,
    pub decreased: Option<StatKey>,
}

/// Nature used when the command doesn't name one
pub const DEFAULT_NATURE: &str = "hardy";

impl NatureModifier {
    /// Looks a nature up by name, ignoring case
    /// Neutral and unknown natures change nothing
    pub fn for_nature(name: &str) -> Self {
        use StatKey::*;

        let (increased, decreased) = match name.trim().to_lowercase().as_str() {
            "adamant" => (Attack, SpecialAttack),
            "bold" => (Defense, Attack),
            "brave" => (Attack, Speed),
            "calm" => (SpecialDefense, Attack),
            "careful" => (SpecialDefense, SpecialAttack),
            "gentle" => (SpecialDefense, Defense),
            "hasty" => (Speed, Defense),
            "impish" => (Defense, SpecialAttack),
            "jolly" => (Speed, SpecialAttack),
            "lax" => (Defense, SpecialDefense),
            "lonely" => (Attack, Defense),
            "mild" => (SpecialAttack, Defense),
            "modest" => (SpecialAttack, Attack),
            "naive" => (Speed, SpecialDefense),
            "naughty" => (Attack, SpecialDefense),
            "quiet" => (SpecialAttack, Speed),
            "rash" => (SpecialAttack, SpecialDefense),
            "relaxed" => (Defense, Speed),
            "sassy" => (SpecialDefense, Speed),
            "timid" => (Speed, Attack),
            // bashful, docile, hardy, quirky, serious
            _ => return Self::default(),
        };

        Self {
            increased: Some(increased),
            decreased: Some(decreased),
        }
    }

    pub fn is_neutral(&self) -> bool {
        self.increased.is_none() && self.decreased.is_none()
    }
}
