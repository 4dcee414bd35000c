/// The five thematic segments of the narrative, in scroll order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SceneId {
    Inventory,
    Decision,
    Assembly,
    Verification,
    Outcome,
}

impl SceneId {
    pub const COUNT: usize = 5;

    pub const ALL: [SceneId; SceneId::COUNT] = [
        SceneId::Inventory,
        SceneId::Decision,
        SceneId::Assembly,
        SceneId::Verification,
        SceneId::Outcome,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            SceneId::Inventory => 0,
            SceneId::Decision => 1,
            SceneId::Assembly => 2,
            SceneId::Verification => 3,
            SceneId::Outcome => 4,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SceneId::Inventory => "Inventory",
            SceneId::Decision => "Decision",
            SceneId::Assembly => "Assembly",
            SceneId::Verification => "Verification",
            SceneId::Outcome => "Outcome",
        }
    }

    /// DOM id of the caption block narrating this scene.
    pub fn caption_id(self) -> &'static str {
        match self {
            SceneId::Inventory => "caption-inventory",
            SceneId::Decision => "caption-decision",
            SceneId::Assembly => "caption-assembly",
            SceneId::Verification => "caption-verification",
            SceneId::Outcome => "caption-outcome",
        }
    }
}
