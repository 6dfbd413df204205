//! Frame-variant rule table.
//!
//! Each frame code maps to a small descriptor of what the compositor should
//! stack: which badge, which border, and how the two text lines are
//! treated. Keeping this as data (instead of branching per code inside the
//! compositor) means adding a variant is a table change, and the shared
//! compositing algorithm stays in one place.

/// Badge drawn between the base illustration and the frame border.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Badge {
    /// Title banner; gold art above rarity 3, silver otherwise.
    TitleByRarity,
    /// Toho title banner.
    TitleToho,
    /// Gold title banner regardless of rarity.
    TitleGold,
    /// Illustrator-credit box.
    Illust,
}

/// Frame border drawn over the badge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Border {
    /// Gold above rarity 3, silver otherwise.
    ByRarity,
    /// Toho frame.
    Toho,
    /// Gold frame.
    Gold,
    /// Legend frame.
    Legend,
    /// White frame.
    White,
    /// Silver frame.
    Silver,
}

/// How a text line is rasterized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextTreatment {
    /// White fill with the black drop outline.
    Outlined,
    /// White fill only.
    Plain,
}

/// Which banner rectangle the title badge occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TitleBand {
    /// (14, 833, 630, 148).
    Standard,
    /// (14, 830, 630, 148), three pixels higher.
    Toho,
}

/// Layer/text plan for one frame variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VariantPlan {
    /// Badge layer, if any.
    pub badge: Option<Badge>,
    /// Frame border, if any.
    pub border: Option<Border>,
    /// Illustrator credit treatment, if drawn.
    pub illustrator: Option<TextTreatment>,
    /// Title treatment and banner rect, if drawn.
    pub title: Option<(TextTreatment, TitleBand)>,
}

/// Look up the compositing plan for a frame code.
///
/// Codes outside the table (including negative and large values) return
/// `None`; the caller reports the card as failed and the batch continues.
pub fn variant_plan(frame: i32) -> Option<VariantPlan> {
    use Badge::*;
    use Border::*;
    use TextTreatment::*;

    let plan = match frame {
        1 => VariantPlan {
            badge: Some(TitleByRarity),
            border: Some(ByRarity),
            illustrator: Some(Outlined),
            title: Some((Outlined, TitleBand::Standard)),
        },
        2 => VariantPlan {
            badge: Some(Illust),
            border: Some(ByRarity),
            illustrator: Some(Outlined),
            title: None,
        },
        3 => VariantPlan {
            badge: None,
            border: None,
            illustrator: Some(Outlined),
            title: None,
        },
        4 => VariantPlan {
            badge: None,
            border: None,
            illustrator: None,
            title: None,
        },
        5 => VariantPlan {
            badge: None,
            border: Some(Legend),
            illustrator: Some(Plain),
            title: Some((Plain, TitleBand::Standard)),
        },
        6 => VariantPlan {
            badge: Some(TitleToho),
            border: Some(Toho),
            illustrator: Some(Outlined),
            title: Some((Outlined, TitleBand::Toho)),
        },
        7 => VariantPlan {
            badge: Some(Illust),
            border: Some(Toho),
            illustrator: Some(Outlined),
            title: None,
        },
        10 => VariantPlan {
            badge: Some(TitleGold),
            border: Some(Gold),
            illustrator: Some(Outlined),
            title: Some((Outlined, TitleBand::Standard)),
        },
        11 => VariantPlan {
            badge: Some(Illust),
            border: Some(Gold),
            illustrator: Some(Outlined),
            title: None,
        },
        12 => VariantPlan {
            badge: None,
            border: Some(White),
            illustrator: None,
            title: None,
        },
        13 => VariantPlan {
            badge: None,
            border: Some(Silver),
            illustrator: None,
            title: None,
        },
        _ => return None,
    };
    Some(plan)
}
