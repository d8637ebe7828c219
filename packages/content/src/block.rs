//! # Lesson Blocks
//!
//! A lesson is an ordered list of blocks. Every block is one of a closed set
//! of kinds, each carrying its own payload:
//!
//! ```text
//! { "id": "b-1", "type": "mcq_single", "content": { ... }, "config": { ... } }
//! ```
//!
//! `BlockContent` is the tagged union over all kinds. `BlockKind` is the
//! fieldless mirror used for dispatch tables, display and parsing of the
//! `type` string. Adding a kind means adding a variant to both enums; the
//! exhaustive matches below and in `schema` point at every other place that
//! needs updating.

use crate::exercise::ExerciseConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A single lesson block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: String,

    /// `type` + `content` pair
    #[serde(flatten)]
    pub content: BlockContent,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ExerciseConfig>,
}

impl Block {
    /// Content block (no exercise config)
    pub fn new(id: impl Into<String>, content: BlockContent) -> Self {
        Self {
            id: id.into(),
            content,
            config: None,
        }
    }

    /// Exercise block with config
    pub fn exercise(id: impl Into<String>, content: BlockContent, config: ExerciseConfig) -> Self {
        Self {
            id: id.into(),
            content,
            config: Some(config),
        }
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    pub fn title(&self) -> &str {
        self.content.title()
    }

    pub fn is_exercise(&self) -> bool {
        self.kind().category().is_exercise()
    }
}

/// Block payload, tagged by the block `type`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum BlockContent {
    // Content
    Video(VideoContent),
    Text(TextContent),
    Image(ImageContent),
    Audio(AudioContent),
    Attachment(AttachmentContent),

    // Multiple choice
    McqSingle(ChoiceContent),
    McqMultiple(MultiChoiceContent),
    TrueFalse(ChoiceContent),
    ImageChoice(ChoiceContent),

    // Fill in the blank
    FillBlank(FillBlankContent),
    FillBlankDropdown(FillBlankContent),
    WordBank(FillBlankContent),

    // Matching
    Matching(MatchingContent),
    ImageMatching(MatchingContent),
    AudioMatching(MatchingContent),

    // Reordering
    SentenceReorder(ReorderContent),
    WordReorder(ReorderContent),
    ParagraphReorder(ReorderContent),

    // Speaking
    Pronunciation(SpeakingContent),
    ReadAloud(SpeakingContent),
    RepeatAfterMe(SpeakingContent),
    SpeakingPrompt(SpeakingContent),

    // Listening
    ListeningComprehension(ListeningContent),
    Dictation(ListeningContent),
    ListenAndSelect(ListeningContent),
    ListeningGapFill(ListeningContent),

    // Writing
    ShortAnswer(WritingContent),
    Essay(WritingContent),
    Translation(WritingContent),
    SentenceBuilding(WritingContent),

    // Grammar & vocabulary
    GrammarDrill(DrillContent),
    VerbConjugation(DrillContent),
    ErrorCorrection(DrillContent),
    Flashcards(VocabularyContent),
    VocabularyList(VocabularyContent),
    Categorization(CategorizationContent),

    // AI feedback
    AiConversation(ConversationContent),
    RolePlay(ConversationContent),
    AiWritingFeedback(FeedbackContent),
    AiPronunciationFeedback(FeedbackContent),
}

impl BlockContent {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockContent::Video(_) => BlockKind::Video,
            BlockContent::Text(_) => BlockKind::Text,
            BlockContent::Image(_) => BlockKind::Image,
            BlockContent::Audio(_) => BlockKind::Audio,
            BlockContent::Attachment(_) => BlockKind::Attachment,
            BlockContent::McqSingle(_) => BlockKind::McqSingle,
            BlockContent::McqMultiple(_) => BlockKind::McqMultiple,
            BlockContent::TrueFalse(_) => BlockKind::TrueFalse,
            BlockContent::ImageChoice(_) => BlockKind::ImageChoice,
            BlockContent::FillBlank(_) => BlockKind::FillBlank,
            BlockContent::FillBlankDropdown(_) => BlockKind::FillBlankDropdown,
            BlockContent::WordBank(_) => BlockKind::WordBank,
            BlockContent::Matching(_) => BlockKind::Matching,
            BlockContent::ImageMatching(_) => BlockKind::ImageMatching,
            BlockContent::AudioMatching(_) => BlockKind::AudioMatching,
            BlockContent::SentenceReorder(_) => BlockKind::SentenceReorder,
            BlockContent::WordReorder(_) => BlockKind::WordReorder,
            BlockContent::ParagraphReorder(_) => BlockKind::ParagraphReorder,
            BlockContent::Pronunciation(_) => BlockKind::Pronunciation,
            BlockContent::ReadAloud(_) => BlockKind::ReadAloud,
            BlockContent::RepeatAfterMe(_) => BlockKind::RepeatAfterMe,
            BlockContent::SpeakingPrompt(_) => BlockKind::SpeakingPrompt,
            BlockContent::ListeningComprehension(_) => BlockKind::ListeningComprehension,
            BlockContent::Dictation(_) => BlockKind::Dictation,
            BlockContent::ListenAndSelect(_) => BlockKind::ListenAndSelect,
            BlockContent::ListeningGapFill(_) => BlockKind::ListeningGapFill,
            BlockContent::ShortAnswer(_) => BlockKind::ShortAnswer,
            BlockContent::Essay(_) => BlockKind::Essay,
            BlockContent::Translation(_) => BlockKind::Translation,
            BlockContent::SentenceBuilding(_) => BlockKind::SentenceBuilding,
            BlockContent::GrammarDrill(_) => BlockKind::GrammarDrill,
            BlockContent::VerbConjugation(_) => BlockKind::VerbConjugation,
            BlockContent::ErrorCorrection(_) => BlockKind::ErrorCorrection,
            BlockContent::Flashcards(_) => BlockKind::Flashcards,
            BlockContent::VocabularyList(_) => BlockKind::VocabularyList,
            BlockContent::Categorization(_) => BlockKind::Categorization,
            BlockContent::AiConversation(_) => BlockKind::AiConversation,
            BlockContent::RolePlay(_) => BlockKind::RolePlay,
            BlockContent::AiWritingFeedback(_) => BlockKind::AiWritingFeedback,
            BlockContent::AiPronunciationFeedback(_) => BlockKind::AiPronunciationFeedback,
        }
    }

    /// Display title shown in the lesson canvas
    pub fn title(&self) -> &str {
        match self {
            BlockContent::Video(c) => &c.title,
            BlockContent::Text(c) => &c.title,
            BlockContent::Image(c) => &c.title,
            BlockContent::Audio(c) => &c.title,
            BlockContent::Attachment(c) => &c.title,
            BlockContent::McqSingle(c) | BlockContent::TrueFalse(c) | BlockContent::ImageChoice(c) => {
                &c.title
            }
            BlockContent::McqMultiple(c) => &c.title,
            BlockContent::FillBlank(c)
            | BlockContent::FillBlankDropdown(c)
            | BlockContent::WordBank(c) => &c.title,
            BlockContent::Matching(c)
            | BlockContent::ImageMatching(c)
            | BlockContent::AudioMatching(c) => &c.title,
            BlockContent::SentenceReorder(c)
            | BlockContent::WordReorder(c)
            | BlockContent::ParagraphReorder(c) => &c.title,
            BlockContent::Pronunciation(c)
            | BlockContent::ReadAloud(c)
            | BlockContent::RepeatAfterMe(c)
            | BlockContent::SpeakingPrompt(c) => &c.title,
            BlockContent::ListeningComprehension(c)
            | BlockContent::Dictation(c)
            | BlockContent::ListenAndSelect(c)
            | BlockContent::ListeningGapFill(c) => &c.title,
            BlockContent::ShortAnswer(c)
            | BlockContent::Essay(c)
            | BlockContent::Translation(c)
            | BlockContent::SentenceBuilding(c) => &c.title,
            BlockContent::GrammarDrill(c)
            | BlockContent::VerbConjugation(c)
            | BlockContent::ErrorCorrection(c) => &c.title,
            BlockContent::Flashcards(c) | BlockContent::VocabularyList(c) => &c.title,
            BlockContent::Categorization(c) => &c.title,
            BlockContent::AiConversation(c) | BlockContent::RolePlay(c) => &c.title,
            BlockContent::AiWritingFeedback(c) | BlockContent::AiPronunciationFeedback(c) => {
                &c.title
            }
        }
    }
}

/// Block category, used for palette grouping and config rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockCategory {
    Content,
    MultipleChoice,
    FillBlank,
    Matching,
    Reordering,
    Speaking,
    Listening,
    Writing,
    GrammarVocabulary,
    AiFeedback,
}

impl BlockCategory {
    pub fn is_exercise(self) -> bool {
        self != BlockCategory::Content
    }
}

/// Fieldless mirror of `BlockContent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Video,
    Text,
    Image,
    Audio,
    Attachment,
    McqSingle,
    McqMultiple,
    TrueFalse,
    ImageChoice,
    FillBlank,
    FillBlankDropdown,
    WordBank,
    Matching,
    ImageMatching,
    AudioMatching,
    SentenceReorder,
    WordReorder,
    ParagraphReorder,
    Pronunciation,
    ReadAloud,
    RepeatAfterMe,
    SpeakingPrompt,
    ListeningComprehension,
    Dictation,
    ListenAndSelect,
    ListeningGapFill,
    ShortAnswer,
    Essay,
    Translation,
    SentenceBuilding,
    GrammarDrill,
    VerbConjugation,
    ErrorCorrection,
    Flashcards,
    VocabularyList,
    Categorization,
    AiConversation,
    RolePlay,
    AiWritingFeedback,
    AiPronunciationFeedback,
}

impl BlockKind {
    pub const ALL: [BlockKind; 40] = [
        BlockKind::Video,
        BlockKind::Text,
        BlockKind::Image,
        BlockKind::Audio,
        BlockKind::Attachment,
        BlockKind::McqSingle,
        BlockKind::McqMultiple,
        BlockKind::TrueFalse,
        BlockKind::ImageChoice,
        BlockKind::FillBlank,
        BlockKind::FillBlankDropdown,
        BlockKind::WordBank,
        BlockKind::Matching,
        BlockKind::ImageMatching,
        BlockKind::AudioMatching,
        BlockKind::SentenceReorder,
        BlockKind::WordReorder,
        BlockKind::ParagraphReorder,
        BlockKind::Pronunciation,
        BlockKind::ReadAloud,
        BlockKind::RepeatAfterMe,
        BlockKind::SpeakingPrompt,
        BlockKind::ListeningComprehension,
        BlockKind::Dictation,
        BlockKind::ListenAndSelect,
        BlockKind::ListeningGapFill,
        BlockKind::ShortAnswer,
        BlockKind::Essay,
        BlockKind::Translation,
        BlockKind::SentenceBuilding,
        BlockKind::GrammarDrill,
        BlockKind::VerbConjugation,
        BlockKind::ErrorCorrection,
        BlockKind::Flashcards,
        BlockKind::VocabularyList,
        BlockKind::Categorization,
        BlockKind::AiConversation,
        BlockKind::RolePlay,
        BlockKind::AiWritingFeedback,
        BlockKind::AiPronunciationFeedback,
    ];

    /// The `type` tag as it appears in serialized blocks
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Video => "video",
            BlockKind::Text => "text",
            BlockKind::Image => "image",
            BlockKind::Audio => "audio",
            BlockKind::Attachment => "attachment",
            BlockKind::McqSingle => "mcq_single",
            BlockKind::McqMultiple => "mcq_multiple",
            BlockKind::TrueFalse => "true_false",
            BlockKind::ImageChoice => "image_choice",
            BlockKind::FillBlank => "fill_blank",
            BlockKind::FillBlankDropdown => "fill_blank_dropdown",
            BlockKind::WordBank => "word_bank",
            BlockKind::Matching => "matching",
            BlockKind::ImageMatching => "image_matching",
            BlockKind::AudioMatching => "audio_matching",
            BlockKind::SentenceReorder => "sentence_reorder",
            BlockKind::WordReorder => "word_reorder",
            BlockKind::ParagraphReorder => "paragraph_reorder",
            BlockKind::Pronunciation => "pronunciation",
            BlockKind::ReadAloud => "read_aloud",
            BlockKind::RepeatAfterMe => "repeat_after_me",
            BlockKind::SpeakingPrompt => "speaking_prompt",
            BlockKind::ListeningComprehension => "listening_comprehension",
            BlockKind::Dictation => "dictation",
            BlockKind::ListenAndSelect => "listen_and_select",
            BlockKind::ListeningGapFill => "listening_gap_fill",
            BlockKind::ShortAnswer => "short_answer",
            BlockKind::Essay => "essay",
            BlockKind::Translation => "translation",
            BlockKind::SentenceBuilding => "sentence_building",
            BlockKind::GrammarDrill => "grammar_drill",
            BlockKind::VerbConjugation => "verb_conjugation",
            BlockKind::ErrorCorrection => "error_correction",
            BlockKind::Flashcards => "flashcards",
            BlockKind::VocabularyList => "vocabulary_list",
            BlockKind::Categorization => "categorization",
            BlockKind::AiConversation => "ai_conversation",
            BlockKind::RolePlay => "role_play",
            BlockKind::AiWritingFeedback => "ai_writing_feedback",
            BlockKind::AiPronunciationFeedback => "ai_pronunciation_feedback",
        }
    }

    pub fn category(self) -> BlockCategory {
        use BlockCategory as C;
        match self {
            BlockKind::Video
            | BlockKind::Text
            | BlockKind::Image
            | BlockKind::Audio
            | BlockKind::Attachment => C::Content,
            BlockKind::McqSingle
            | BlockKind::McqMultiple
            | BlockKind::TrueFalse
            | BlockKind::ImageChoice => C::MultipleChoice,
            BlockKind::FillBlank | BlockKind::FillBlankDropdown | BlockKind::WordBank => C::FillBlank,
            BlockKind::Matching | BlockKind::ImageMatching | BlockKind::AudioMatching => C::Matching,
            BlockKind::SentenceReorder | BlockKind::WordReorder | BlockKind::ParagraphReorder => {
                C::Reordering
            }
            BlockKind::Pronunciation
            | BlockKind::ReadAloud
            | BlockKind::RepeatAfterMe
            | BlockKind::SpeakingPrompt => C::Speaking,
            BlockKind::ListeningComprehension
            | BlockKind::Dictation
            | BlockKind::ListenAndSelect
            | BlockKind::ListeningGapFill => C::Listening,
            BlockKind::ShortAnswer
            | BlockKind::Essay
            | BlockKind::Translation
            | BlockKind::SentenceBuilding => C::Writing,
            BlockKind::GrammarDrill
            | BlockKind::VerbConjugation
            | BlockKind::ErrorCorrection
            | BlockKind::Flashcards
            | BlockKind::VocabularyList
            | BlockKind::Categorization => C::GrammarVocabulary,
            BlockKind::AiConversation
            | BlockKind::RolePlay
            | BlockKind::AiWritingFeedback
            | BlockKind::AiPronunciationFeedback => C::AiFeedback,
        }
    }

    /// Whether the block records learner speech and can take `speakingConfig`
    pub fn accepts_speaking_config(self) -> bool {
        self.category() == BlockCategory::Speaking || self == BlockKind::AiPronunciationFeedback
    }

    pub fn accepts_listening_config(self) -> bool {
        self.category() == BlockCategory::Listening
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown block type `{0}`")]
pub struct UnknownBlockKind(pub String);

impl FromStr for BlockKind {
    type Err = UnknownBlockKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownBlockKind(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoContent {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    #[serde(default)]
    pub title: String,
    /// Markdown body
    pub body: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageContent {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioContent {
    #[serde(default)]
    pub title: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentContent {
    #[serde(default)]
    pub title: String,
    pub url: String,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<u64>,
}

/// Single-answer choice (`mcq_single`, `true_false`, `image_choice`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceContent {
    #[serde(default)]
    pub title: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiChoiceContent {
    #[serde(default)]
    pub title: String,
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blank {
    pub answer: String,
    /// Other accepted spellings
    #[serde(default)]
    pub alternatives: Vec<String>,
    /// Dropdown choices (`fill_blank_dropdown` only)
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBlankContent {
    #[serde(default)]
    pub title: String,
    pub passage: String,
    #[serde(default)]
    pub blanks: Vec<Blank>,
    /// Shared pool of words (`word_bank` only)
    #[serde(default)]
    pub word_bank: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingPair {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub matching_pairs: Vec<MatchingPair>,
}

/// Items listed in their correct order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakingContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_audio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub correct_answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListeningContent {
    #[serde(default)]
    pub title: String,
    pub audio_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
    #[serde(default)]
    pub questions: Vec<ListeningQuestion>,
    /// Gaps in the transcript (`listening_gap_fill` only)
    #[serde(default)]
    pub blanks: Vec<Blank>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WritingContent {
    #[serde(default)]
    pub title: String,
    pub prompt: String,
    /// Text to translate (`translation` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_words: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_words: Option<u32>,
    /// Tiles the learner assembles (`sentence_building` only)
    #[serde(default)]
    pub word_tiles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillItem {
    pub prompt: String,
    pub answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrillContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
    #[serde(default)]
    pub items: Vec<DrillItem>,
    /// Infinitive being conjugated (`verb_conjugation` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tense: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyEntry {
    pub term: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub entries: Vec<VocabularyEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub name: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorizationContent {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub groups: Vec<CategoryGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContent {
    #[serde(default)]
    pub title: String,
    pub scenario: String,
    pub ai_role: String,
    /// Role the learner plays (`role_play` only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learner_role: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_turns: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackContent {
    #[serde(default)]
    pub title: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_text: Option<String>,
    #[serde(default)]
    pub rubric: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_kind_tags_are_unique_and_parse_back() {
        let tags: HashSet<&str> = BlockKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(tags.len(), BlockKind::ALL.len());

        for kind in BlockKind::ALL {
            assert_eq!(kind.as_str().parse::<BlockKind>(), Ok(kind));
        }
        assert!("carousel".parse::<BlockKind>().is_err());
    }

    #[test]
    fn test_unknown_kind_error() {
        let err = "carousel".parse::<BlockKind>().unwrap_err();
        assert_eq!(err, UnknownBlockKind("carousel".to_string()));
        assert_eq!(err.to_string(), "unknown block type `carousel`");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn test_kind_serde_matches_tag() {
        for kind in BlockKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_only_five_content_kinds() {
        let content: Vec<BlockKind> = BlockKind::ALL
            .into_iter()
            .filter(|k| !k.category().is_exercise())
            .collect();
        assert_eq!(
            content,
            vec![
                BlockKind::Video,
                BlockKind::Text,
                BlockKind::Image,
                BlockKind::Audio,
                BlockKind::Attachment
            ]
        );
    }

    #[test]
    fn test_block_json_shape() {
        let block = Block::new(
            "b-1",
            BlockContent::McqSingle(ChoiceContent {
                title: "Greetings".to_string(),
                question: "How do you say hello?".to_string(),
                options: vec!["Hola".to_string(), "Adiós".to_string()],
                correct_answer: "Hola".to_string(),
                ..Default::default()
            }),
        );

        let json = serde_json::to_value(&block).unwrap();
        assert_eq!(json["id"], "b-1");
        assert_eq!(json["type"], "mcq_single");
        assert_eq!(json["content"]["correctAnswer"], "Hola");
        assert!(json.get("config").is_none());

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
        assert_eq!(back.title(), "Greetings");
    }
}
