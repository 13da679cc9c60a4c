use crate::domain::{CoreError, Word};
use crate::ports::WordCatalog;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const INITIAL_BAND: i64 = 10;
const MAX_BAND: i64 = 100;

/// Produces up to `n` distractors for `correct`, preferring words within
/// +/-10 difficulty ranks, widening the band monotonically until `n` are
/// found or the catalog is exhausted. The returned set is shuffled; callers
/// decide where to place the correct answer.
pub async fn generate(
    catalog: &dyn WordCatalog,
    correct: &Word,
    n: usize,
    shuffle_seed: u64,
) -> Result<Vec<Word>, CoreError> {
    let mut band = INITIAL_BAND;
    let mut found: Vec<Word> = Vec::new();
    let mut seen_ids = vec![correct.id];

    loop {
        let candidates = catalog
            .words_within_band(correct.difficulty_rank, band, &seen_ids)
            .await?;

        for candidate in candidates {
            if found.len() >= n {
                break;
            }
            if candidate.target_form == correct.target_form {
                continue;
            }
            seen_ids.push(candidate.id);
            found.push(candidate);
        }

        if found.len() >= n || band >= MAX_BAND {
            break;
        }
        band *= 2;
    }

    let mut rng = seeded_rng(correct.id, shuffle_seed);
    found.shuffle(&mut rng);
    Ok(found)
}

fn seeded_rng(word_id: i64, extra: u64) -> StdRng {
    let mut hasher = DefaultHasher::new();
    word_id.hash(&mut hasher);
    extra.hash(&mut hasher);
    StdRng::seed_from_u64(hasher.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::MockWordCatalog;

    fn word(id: i64, rank: i64, target_form: &str) -> Word {
        Word {
            id,
            unit: 1,
            difficulty_rank: rank,
            source_form: format!("s{id}"),
            target_form: target_form.to_string(),
            audio_ref: None,
        }
    }

    #[tokio::test]
    async fn excludes_correct_id_and_matching_target_form() {
        let correct = word(1, 50, "apple");
        let mut catalog = MockWordCatalog::new();
        catalog
            .expect_words_within_band()
            .returning(move |_, _, _| {
                Ok(vec![
                    word(2, 52, "banana"),
                    word(3, 48, "apple"), // same target form as correct, must be dropped
                    word(4, 55, "cherry"),
                ])
            });

        let distractors = generate(&catalog, &correct, 2, 7).await.unwrap();
        assert_eq!(distractors.len(), 2);
        assert!(distractors.iter().all(|w| w.target_form != "apple"));
        assert!(distractors.iter().all(|w| w.id != correct.id));
    }

    #[tokio::test]
    async fn widens_band_when_insufficient_candidates() {
        let correct = word(1, 50, "apple");
        let mut catalog = MockWordCatalog::new();
        let mut call = 0;
        catalog.expect_words_within_band().returning(move |_, band, _| {
            call += 1;
            if band == INITIAL_BAND {
                Ok(vec![word(2, 52, "banana")])
            } else {
                Ok(vec![word(2, 52, "banana"), word(3, 70, "cherry"), word(5, 80, "date")])
            }
        });

        let distractors = generate(&catalog, &correct, 3, 7).await.unwrap();
        assert_eq!(distractors.len(), 3);
    }
}
