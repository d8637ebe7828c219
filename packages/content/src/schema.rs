//! # Block Schema Validation
//!
//! Checks that a block's payload supplies what its kind needs (an
//! `mcq_single` needs options and a correct answer drawn from them, a
//! `dictation` needs a transcript, ...) and that its config only carries
//! groups relevant to its category.
//!
//! Every kind is listed in one `match`, so a new variant does not compile
//! until its rules are written down here.

use crate::block::*;
use crate::error::{SchemaError, SchemaResult};
use crate::exercise::ExerciseConfig;
use std::collections::HashSet;

/// Validate payload and config of a block
pub fn validate_block(block: &Block) -> SchemaResult<()> {
    let kind = block.kind();
    validate_content(kind, &block.content)?;
    validate_config(kind, block.config.as_ref())
}

impl Block {
    pub fn validate(&self) -> SchemaResult<()> {
        validate_block(self)
    }
}

fn validate_content(kind: BlockKind, content: &BlockContent) -> SchemaResult<()> {
    match content {
        BlockContent::Video(c) => require(kind, "url", &c.url),
        BlockContent::Text(c) => require(kind, "body", &c.body),
        BlockContent::Image(c) => require(kind, "url", &c.url),
        BlockContent::Audio(c) => require(kind, "url", &c.url),
        BlockContent::Attachment(c) => {
            require(kind, "url", &c.url)?;
            require(kind, "fileName", &c.file_name)
        }

        BlockContent::McqSingle(c) | BlockContent::ImageChoice(c) => check_choice(kind, c),
        BlockContent::TrueFalse(c) => {
            check_choice(kind, c)?;
            if c.options.len() != 2 {
                return Err(SchemaError::invalid(kind, "options", "exactly two options expected"));
            }
            Ok(())
        }
        BlockContent::McqMultiple(c) => {
            require(kind, "question", &c.question)?;
            check_options(kind, "options", &c.options)?;
            if c.correct_answers.is_empty() {
                return Err(SchemaError::missing(kind, "correctAnswers"));
            }
            for answer in &c.correct_answers {
                if !c.options.contains(answer) {
                    return Err(SchemaError::invalid(
                        kind,
                        "correctAnswers",
                        format!("`{}` is not one of the options", answer),
                    ));
                }
            }
            Ok(())
        }

        BlockContent::FillBlank(c) => check_fill_blank(kind, c),
        BlockContent::FillBlankDropdown(c) => {
            check_fill_blank(kind, c)?;
            for blank in &c.blanks {
                check_options(kind, "blanks.options", &blank.options)?;
                if !blank.options.contains(&blank.answer) {
                    return Err(SchemaError::invalid(
                        kind,
                        "blanks.options",
                        format!("answer `{}` is not one of the options", blank.answer),
                    ));
                }
            }
            Ok(())
        }
        BlockContent::WordBank(c) => {
            check_fill_blank(kind, c)?;
            if c.word_bank.is_empty() {
                return Err(SchemaError::missing(kind, "wordBank"));
            }
            for blank in &c.blanks {
                if !c.word_bank.contains(&blank.answer) {
                    return Err(SchemaError::invalid(
                        kind,
                        "wordBank",
                        format!("answer `{}` is missing from the word bank", blank.answer),
                    ));
                }
            }
            Ok(())
        }

        BlockContent::Matching(c)
        | BlockContent::ImageMatching(c)
        | BlockContent::AudioMatching(c) => {
            if c.matching_pairs.len() < 2 {
                return Err(SchemaError::invalid(kind, "matchingPairs", "at least two pairs expected"));
            }
            let mut lefts = HashSet::new();
            for pair in &c.matching_pairs {
                require(kind, "matchingPairs.left", &pair.left)?;
                require(kind, "matchingPairs.right", &pair.right)?;
                if !lefts.insert(pair.left.as_str()) {
                    return Err(SchemaError::invalid(
                        kind,
                        "matchingPairs",
                        format!("`{}` appears twice", pair.left),
                    ));
                }
            }
            Ok(())
        }

        BlockContent::SentenceReorder(c)
        | BlockContent::WordReorder(c)
        | BlockContent::ParagraphReorder(c) => {
            if c.items.len() < 2 {
                return Err(SchemaError::invalid(kind, "items", "at least two items expected"));
            }
            c.items.iter().try_for_each(|item| require(kind, "items", item))
        }

        BlockContent::Pronunciation(c) | BlockContent::ReadAloud(c) => {
            require_some(kind, "referenceText", &c.reference_text)
        }
        BlockContent::RepeatAfterMe(c) => {
            require_some(kind, "referenceText", &c.reference_text)?;
            require_some(kind, "referenceAudioUrl", &c.reference_audio_url)
        }
        BlockContent::SpeakingPrompt(c) => require_some(kind, "prompt", &c.prompt),

        BlockContent::ListeningComprehension(c) | BlockContent::ListenAndSelect(c) => {
            require(kind, "audioUrl", &c.audio_url)?;
            if c.questions.is_empty() {
                return Err(SchemaError::missing(kind, "questions"));
            }
            for question in &c.questions {
                require(kind, "questions.question", &question.question)?;
                check_options(kind, "questions.options", &question.options)?;
                if !question.options.contains(&question.correct_answer) {
                    return Err(SchemaError::invalid(
                        kind,
                        "questions.correctAnswer",
                        "must be one of the question's options",
                    ));
                }
            }
            Ok(())
        }
        BlockContent::Dictation(c) => {
            require(kind, "audioUrl", &c.audio_url)?;
            require_some(kind, "transcript", &c.transcript)
        }
        BlockContent::ListeningGapFill(c) => {
            require(kind, "audioUrl", &c.audio_url)?;
            require_some(kind, "transcript", &c.transcript)?;
            check_blanks(kind, &c.blanks)
        }

        BlockContent::ShortAnswer(c) | BlockContent::Essay(c) => check_writing(kind, c),
        BlockContent::Translation(c) => {
            check_writing(kind, c)?;
            require_some(kind, "sourceText", &c.source_text)
        }
        BlockContent::SentenceBuilding(c) => {
            check_writing(kind, c)?;
            if c.word_tiles.len() < 2 {
                return Err(SchemaError::invalid(kind, "wordTiles", "at least two tiles expected"));
            }
            require_some(kind, "sampleAnswer", &c.sample_answer)
        }

        BlockContent::GrammarDrill(c) | BlockContent::ErrorCorrection(c) => check_drill(kind, c),
        BlockContent::VerbConjugation(c) => {
            require_some(kind, "verb", &c.verb)?;
            check_drill(kind, c)
        }
        BlockContent::Flashcards(c) | BlockContent::VocabularyList(c) => {
            if c.entries.is_empty() {
                return Err(SchemaError::missing(kind, "entries"));
            }
            for entry in &c.entries {
                require(kind, "entries.term", &entry.term)?;
                require(kind, "entries.translation", &entry.translation)?;
            }
            Ok(())
        }
        BlockContent::Categorization(c) => {
            if c.groups.len() < 2 {
                return Err(SchemaError::invalid(kind, "groups", "at least two groups expected"));
            }
            for group in &c.groups {
                require(kind, "groups.name", &group.name)?;
                if group.items.is_empty() {
                    return Err(SchemaError::missing(kind, "groups.items"));
                }
            }
            Ok(())
        }

        BlockContent::AiConversation(c) => check_conversation(kind, c),
        BlockContent::RolePlay(c) => {
            check_conversation(kind, c)?;
            require_some(kind, "learnerRole", &c.learner_role)
        }
        BlockContent::AiWritingFeedback(c) => require(kind, "prompt", &c.prompt),
        BlockContent::AiPronunciationFeedback(c) => {
            require(kind, "prompt", &c.prompt)?;
            require_some(kind, "referenceText", &c.reference_text)
        }
    }
}

fn validate_config(kind: BlockKind, config: Option<&ExerciseConfig>) -> SchemaResult<()> {
    let Some(config) = config else {
        return Ok(());
    };

    if !kind.category().is_exercise() {
        return Err(SchemaError::UnexpectedConfig { kind });
    }
    if config.speaking_config.is_some() && !kind.accepts_speaking_config() {
        return Err(SchemaError::MisplacedConfig { kind, group: "speakingConfig" });
    }
    if config.listening_config.is_some() && !kind.accepts_listening_config() {
        return Err(SchemaError::MisplacedConfig { kind, group: "listeningConfig" });
    }

    if config.timer_seconds == Some(0) {
        return Err(SchemaError::invalid(kind, "timerSeconds", "must be positive"));
    }
    if config.max_attempts == Some(0) {
        return Err(SchemaError::invalid(kind, "maxAttempts", "must be positive"));
    }
    if let Some(scoring) = &config.scoring {
        if scoring.passing_score.is_some_and(|pass| pass > scoring.points) {
            return Err(SchemaError::invalid(
                kind,
                "scoring.passingScore",
                "cannot exceed the block's points",
            ));
        }
    }
    if let Some(speaking) = &config.speaking_config {
        require(kind, "speakingConfig.language", &speaking.language)?;
        if speaking.min_accuracy.is_some_and(|acc| acc > 100) {
            return Err(SchemaError::invalid(kind, "speakingConfig.minAccuracy", "must be 0-100"));
        }
    }
    if let Some(listening) = &config.listening_config {
        if listening.max_plays == Some(0) {
            return Err(SchemaError::invalid(kind, "listeningConfig.maxPlays", "must be positive"));
        }
        if listening
            .playback_rate
            .is_some_and(|rate| !(0.25..=4.0).contains(&rate))
        {
            return Err(SchemaError::invalid(
                kind,
                "listeningConfig.playbackRate",
                "must be between 0.25 and 4.0",
            ));
        }
    }

    Ok(())
}

fn require(kind: BlockKind, field: &'static str, value: &str) -> SchemaResult<()> {
    if value.trim().is_empty() {
        Err(SchemaError::missing(kind, field))
    } else {
        Ok(())
    }
}

fn require_some(kind: BlockKind, field: &'static str, value: &Option<String>) -> SchemaResult<()> {
    require(kind, field, value.as_deref().unwrap_or(""))
}

fn check_options(kind: BlockKind, field: &'static str, options: &[String]) -> SchemaResult<()> {
    if options.is_empty() {
        return Err(SchemaError::missing(kind, field));
    }
    let mut seen = HashSet::new();
    for option in options {
        require(kind, field, option)?;
        if !seen.insert(option.as_str()) {
            return Err(SchemaError::invalid(kind, field, format!("`{}` appears twice", option)));
        }
    }
    Ok(())
}

fn check_choice(kind: BlockKind, c: &ChoiceContent) -> SchemaResult<()> {
    require(kind, "question", &c.question)?;
    check_options(kind, "options", &c.options)?;
    require(kind, "correctAnswer", &c.correct_answer)?;
    if !c.options.contains(&c.correct_answer) {
        return Err(SchemaError::invalid(
            kind,
            "correctAnswer",
            format!("`{}` is not one of the options", c.correct_answer),
        ));
    }
    Ok(())
}

fn check_blanks(kind: BlockKind, blanks: &[Blank]) -> SchemaResult<()> {
    if blanks.is_empty() {
        return Err(SchemaError::missing(kind, "blanks"));
    }
    blanks
        .iter()
        .try_for_each(|blank| require(kind, "blanks.answer", &blank.answer))
}

fn check_fill_blank(kind: BlockKind, c: &FillBlankContent) -> SchemaResult<()> {
    require(kind, "passage", &c.passage)?;
    check_blanks(kind, &c.blanks)
}

fn check_writing(kind: BlockKind, c: &WritingContent) -> SchemaResult<()> {
    require(kind, "prompt", &c.prompt)?;
    if let (Some(min), Some(max)) = (c.min_words, c.max_words) {
        if min > max {
            return Err(SchemaError::invalid(kind, "minWords", "cannot exceed maxWords"));
        }
    }
    Ok(())
}

fn check_drill(kind: BlockKind, c: &DrillContent) -> SchemaResult<()> {
    if c.items.is_empty() {
        return Err(SchemaError::missing(kind, "items"));
    }
    for item in &c.items {
        require(kind, "items.prompt", &item.prompt)?;
        require(kind, "items.answer", &item.answer)?;
    }
    Ok(())
}

fn check_conversation(kind: BlockKind, c: &ConversationContent) -> SchemaResult<()> {
    require(kind, "scenario", &c.scenario)?;
    require(kind, "aiRole", &c.ai_role)?;
    if c.max_turns == Some(0) {
        return Err(SchemaError::invalid(kind, "maxTurns", "must be positive"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mcq(options: &[&str], correct: &str) -> Block {
        Block::new(
            "b-1",
            BlockContent::McqSingle(ChoiceContent {
                title: "Colors".to_string(),
                question: "Which one is red?".to_string(),
                options: options.iter().map(|o| o.to_string()).collect(),
                correct_answer: correct.to_string(),
                ..Default::default()
            }),
        )
    }

    #[test]
    fn test_mcq_single_requires_answer_from_options() {
        assert!(mcq(&["rojo", "azul"], "rojo").validate().is_ok());

        let err = mcq(&["rojo", "azul"], "verde").validate().unwrap_err();
        assert_eq!(err.field(), Some("correctAnswer"));

        let err = mcq(&[], "rojo").validate().unwrap_err();
        assert_eq!(err, SchemaError::missing(BlockKind::McqSingle, "options"));

        let err = mcq(&["rojo", "azul"], "").validate().unwrap_err();
        assert_eq!(err, SchemaError::missing(BlockKind::McqSingle, "correctAnswer"));
    }

    #[test]
    fn test_duplicate_options_rejected() {
        let err = mcq(&["rojo", "rojo"], "rojo").validate().unwrap_err();
        assert_eq!(err.field(), Some("options"));
    }

    #[test]
    fn test_content_block_rejects_config() {
        let mut block = Block::new(
            "b-2",
            BlockContent::Text(TextContent {
                title: "Intro".to_string(),
                body: "Welcome!".to_string(),
            }),
        );
        assert!(block.validate().is_ok());

        block.config = Some(ExerciseConfig {
            max_attempts: Some(3),
            ..Default::default()
        });
        assert_eq!(
            block.validate(),
            Err(SchemaError::UnexpectedConfig { kind: BlockKind::Text })
        );
    }

    #[test]
    fn test_speaking_config_only_on_speaking_blocks() {
        let mut block = mcq(&["rojo", "azul"], "rojo");
        block.config = Some(ExerciseConfig::default().with_speaking("es-ES"));
        assert_eq!(
            block.validate(),
            Err(SchemaError::MisplacedConfig {
                kind: BlockKind::McqSingle,
                group: "speakingConfig"
            })
        );

        let read_aloud = Block::exercise(
            "b-3",
            BlockContent::ReadAloud(SpeakingContent {
                title: "Read".to_string(),
                reference_text: Some("Buenos días".to_string()),
                ..Default::default()
            }),
            ExerciseConfig::default().with_speaking("es-ES"),
        );
        assert!(read_aloud.validate().is_ok());
    }

    #[test]
    fn test_passing_score_bounded_by_points() {
        let mut block = mcq(&["rojo", "azul"], "rojo");
        block.config = Some(ExerciseConfig::default().with_scoring(10, Some(12)));
        assert_eq!(block.validate().unwrap_err().field(), Some("scoring.passingScore"));

        block.config = Some(ExerciseConfig::default().with_scoring(10, Some(7)));
        assert!(block.validate().is_ok());
    }
}
