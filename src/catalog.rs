//! The fixed Orton-Gillingham curriculum: five levels of ordered skills.

/// One named unit of the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDefinition {
    pub name: &'static str,
    pub info: Option<&'static str>,
}

const fn skill(name: &'static str) -> SkillDefinition {
    SkillDefinition { name, info: None }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelDefinition {
    pub number: u8,
    pub skills: &'static [SkillDefinition],
}

/// Ordered set of levels. Skill order inside a level drives display and
/// the "first unmastered" focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Catalog {
    levels: &'static [LevelDefinition],
}

impl Catalog {
    pub const fn new(levels: &'static [LevelDefinition]) -> Self {
        Self { levels }
    }

    pub fn levels(&self) -> impl Iterator<Item = &'static LevelDefinition> {
        self.levels.iter()
    }

    pub fn level_numbers(&self) -> impl Iterator<Item = u8> {
        self.levels.iter().map(|level| level.number)
    }

    pub fn skills(&self, level: u8) -> Option<&'static [SkillDefinition]> {
        self.levels
            .iter()
            .find(|definition| definition.number == level)
            .map(|definition| definition.skills)
    }

    pub fn contains_level(&self, level: u8) -> bool {
        self.skills(level).is_some()
    }

    pub fn skill_info(&self, level: u8, skill_name: &str) -> Option<&'static str> {
        self.skills(level)?
            .iter()
            .find(|definition| definition.name == skill_name)
            .and_then(|definition| definition.info)
    }
}

pub static CATALOG: Catalog = Catalog::new(LEVELS);

const LEVELS: &[LevelDefinition] = &[
    LevelDefinition { number: 1, skills: LEVEL_1 },
    LevelDefinition { number: 2, skills: LEVEL_2 },
    LevelDefinition { number: 3, skills: LEVEL_3 },
    LevelDefinition { number: 4, skills: LEVEL_4 },
    LevelDefinition { number: 5, skills: LEVEL_5 },
];

const LEVEL_1: &[SkillDefinition] = &[
    skill("assessment"), skill("syllables"), skill("consonant"), skill("vowel"),
    skill("closed syllables"),
    skill("a"), skill("e"), skill("i"), skill("o"), skill("u"),
    skill("y"), skill("z"), skill("x"), skill("c"), skill("v"), skill("b"), skill("n"),
    skill("m"), skill("l"), skill("k"), skill("j"), skill("h"), skill("g"), skill("f"),
    skill("d"), skill("s"), skill("q"), skill("u"), skill("w"), skill("r"), skill("t"),
    skill("p"), skill("ss"), skill("ll"), skill("zz"), skill("ff"), skill("ch"), skill("sh"),
    skill("th"), skill("wh"), skill("tch"), skill("bl"), skill("st"), skill("str"),
    skill("sp"), skill("spr"), skill("fl"), skill("cl"), skill("i-e"), skill("a-e"),
    skill("an"), skill("beginning blends"), skill("o-e"), skill("e-e"), skill("u-e"),
];

const LEVEL_2: &[SkillDefinition] = &[
    skill("open syllable"),
    skill("y says i"), skill("y says e"), skill("y generalization"),
    skill("tch"), skill("ch/tch generalization"), skill("ang"), skill("ing"), skill("ung"),
    skill("ink"), skill("ank"), skill("unk"), skill("ar"), skill("ir"), skill("ur"),
    skill("er"), skill("or"), skill("-s"), skill("ve"), skill("-er"), skill("war"),
    skill("wor"), skill("ct"), skill("ic"), skill("vc/cv"), skill("vc/ccv"), skill("vcc/cv"),
    skill("ai"), skill("ay"), skill("ai/ay generalizations"), skill("v-e/c"), skill("verb s"),
    skill("se"), skill("-ed (t)"), skill("-ed (d)"), skill("-ed (id)"), skill("-y"),
    skill("ee"), skill("ea"), skill("ey"), skill("all"), skill("al"), skill("ind"),
    skill("ild"), skill("old"), skill("ost"), skill("olt"), skill("-ing"), skill("oa"),
    skill("oe"), skill("ow"), skill("oo food"), skill("oo book"), skill("ou"),
    skill("ou/ow generalization"), skill("assessment"),
];

const LEVEL_3: &[SkillDefinition] = &[
    skill("contractions"), skill("possessives"), skill("oi"), skill("oy"),
    skill("oi/oy generalization"), skill("au"), skill("aw"), skill("au/aw generalization"),
    skill("ou"), skill("ie"), skill("ea bread"), skill("ea steak"), skill("ie piece"),
    skill("igh"), skill("ph"), skill("vowel consonant 1"), skill("vowel consonant 2"),
    skill("vowel consonant 3"), skill("-es"), skill("-ly"), skill("-est"), skill("ce"),
    skill("ci"), skill("cy"), skill("ge"), skill("gy"), skill("gi"), skill("-tion"),
    skill("-sion (shun)"), skill("-sion (zhun)"), skill("-ment"), skill("-ful"),
    skill("-ness"), skill("-ish"), skill("-en"), skill("-less"), skill("schwa a"),
    skill("schwa i"),
    skill("doubling rule"),
    skill("assessment"),
];

const LEVEL_4: &[SkillDefinition] = &[
    skill("ple"), skill("ble"), skill("cle"), skill("dle"), skill("fle"), skill("gle"),
    skill("tle"), skill("kle"), skill("dge"), skill("dge and ge"), skill("stle"),
    skill("ckle"), skill("v.v"), skill("ei /e/ ceiling"), skill("ew /u/ few"),
    skill("ew /oo/ grew"), skill("ui /oo/ juice"), skill("ei /a/ vein"), skill("ey /a/ they"),
    skill("ue /u/ rescue"), skill("ue /oo/ true"), skill("eigh /a/ eight"),
    skill("y-e /i/ type"), skill("un-"), skill("re-"), skill("dis-"), skill("pro-"),
    skill("cor-"), skill("con-"), skill("com-"), skill("con drops n"), skill("de-"),
    skill("pre-"), skill("sub-"), skill("trans-"), skill("non-"), skill("silent e rule"),
    skill("y rule"), skill("doubling rule"), skill("struct"), skill("tract"), skill("port"),
    skill("ject"), skill("miss"), skill("mit"), skill("spire"), skill("scrib"),
    skill("script"), skill("-sed-"), skill("-sit-"), skill("-sess-"), skill("act"),
    skill("dic"), skill("dict"), skill("fin"), skill("rupt"), skill("spect"), skill("spec"),
    skill("spic"), skill("gram"), skill("graph"), skill("meter"), skill("metre"),
    skill("vers"), skill("vert"), skill("fer"), skill("cid/cis"), skill("form"),
    skill("Level 4 Assessment"),
];

const LEVEL_5: &[SkillDefinition] = &[
    skill("rh"), skill("kn"), skill("gh"), skill("wr"), skill("gn"), skill("mb"), skill("gu"),
    skill("mn"), skill("ch /k/"), skill("ch /sh/"), skill("y /i/"), skill("o /u/ mother"),
    skill("i /e/ studio"), skill("ive /iv/"), skill("u /u/ pull"), skill("ale"), skill("ton"),
    skill("om"), skill("que /k/"), skill("qu says /k/"), skill("gue /g/"), skill("wa /wo/"),
    skill("qua /kwo/"), skill("ou /u/"), skill("augh /ot/"), skill("ough /ot/"),
    skill("ouar /er/"), skill("or /er/"), skill("oar /or/"), skill("ear /er/"),
    skill("ear /ar/"), skill("quar /wor/"), skill("sc /s/"), skill("ti /sh/"),
    skill("ci /sh/"), skill("tu /choo/"), skill("age /aj/"), skill("ain /en/"),
    skill("ture /cher/"), skill("ous /es/"), skill("cial /shel/"), skill("tial /shel/"),
    skill("ance /ence/"), skill("ence /ence/"), skill("cal /kel/"), skill("cle /kel/"),
    skill("cian /shen/"), skill("able /ebl/"), skill("ible /ebl/"), skill("ate /it/"),
    skill("alt"), skill("en /en/"), skill("alk /olk/"), skill("ty /te/"), skill("ive /ev/"),
    skill("el /ul/"), skill("age /ij/"), skill("ious"), skill("iate /e/at"), skill("ible"),
    skill("ial /e l/"),
];
