//! Integration tests for the skill matcher

use skill_matcher::input::manager::InputManager;
use skill_matcher::input::staging::StagingStore;
use skill_matcher::processing::extractor::ExtractorOptions;
use skill_matcher::{CandidateAnalyzer, SkillMatchError, SkillVocabulary};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn analyzer() -> CandidateAnalyzer {
    CandidateAnalyzer::new(Arc::new(SkillVocabulary::default()), ExtractorOptions::default())
        .unwrap()
}

#[tokio::test]
async fn test_text_extraction_from_txt() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/resumes/alice.txt");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Alice Smith"));
    assert!(text.contains("PostgreSQL"));
}

#[tokio::test]
async fn test_text_extraction_from_markdown() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/resumes/bob.md");

    let text = manager.extract_text(path).await.unwrap();
    assert!(text.contains("Bob Jones"));
    assert!(text.contains("Power BI"));
    // Should not contain markdown formatting
    assert!(!text.contains("**"));
    assert!(!text.contains("##"));
}

#[tokio::test]
async fn test_caching_functionality() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/job_description.txt");

    let text1 = manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 1);

    let text2 = manager.extract_text(path).await.unwrap();
    assert_eq!(text1, text2);
    assert_eq!(manager.cache_size(), 1);

    manager.clear_cache();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_cache_disabled() {
    let mut manager = InputManager::new().with_cache(false);
    let path = Path::new("tests/fixtures/job_description.txt");

    manager.extract_text(path).await.unwrap();
    assert_eq!(manager.cache_size(), 0);
}

#[tokio::test]
async fn test_unsupported_file_type() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/unsupported.xyz");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(SkillMatchError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_nonexistent_file() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/nonexistent.txt");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(SkillMatchError::InvalidInput(_))));
}

#[tokio::test]
async fn test_collect_candidates_from_directory() {
    let mut manager = InputManager::new();
    let candidates = manager
        .collect_candidates(&[PathBuf::from("tests/fixtures/resumes")])
        .await
        .unwrap();

    // empty.txt is skipped, dan.pdf is kept with its parse error
    let names: Vec<&str> = candidates.iter().map(|c| c.display_name()).collect();
    assert_eq!(names, vec!["alice.txt", "bob.md", "carol.txt", "dan.pdf"]);

    assert!(candidates[0].error.is_none());
    assert!(candidates[3].error.is_some());
    assert!(candidates[3].text.is_empty());
}

#[tokio::test]
async fn test_text_extraction_from_docx() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/erin.docx");

    let text = manager.extract_text(path).await.unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "Erin Park");
    assert_eq!(lines[2], "Skills: Power BI & SQL");
    assert!(!text.contains("<w:"));
}

#[tokio::test]
async fn test_archive_is_not_a_single_document() {
    let mut manager = InputManager::new();
    let path = Path::new("tests/fixtures/resumes_bundle.zip");

    let result = manager.extract_text(path).await;
    assert!(matches!(result, Err(SkillMatchError::UnsupportedFormat(_))));
}

#[tokio::test]
async fn test_collect_candidates_from_archive() {
    let mut manager = InputManager::new();
    let candidates = manager
        .collect_candidates(&[PathBuf::from("tests/fixtures/resumes_bundle.zip")])
        .await
        .unwrap();

    // Directory, __MACOSX metadata, .xyz and empty entries are skipped
    let names: Vec<&str> = candidates.iter().map(|c| c.display_name()).collect();
    assert_eq!(names, vec!["frank.txt", "erin.docx"]);
    assert!(candidates.iter().all(|c| c.error.is_none()));
    assert!(candidates[1].text.contains("Python and pandas"));
}

#[tokio::test]
async fn test_archive_candidates_are_scored() {
    let mut manager = InputManager::new();
    let jd_text = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let candidates = manager
        .collect_candidates(&[PathBuf::from("tests/fixtures/resumes_bundle.zip")])
        .await
        .unwrap();

    let batch = analyzer().analyze(&jd_text, &candidates).unwrap();
    assert!(batch.failures.is_empty());

    let frank = &batch.candidates[0];
    assert_eq!(frank.name, "frank.txt");
    assert_eq!(frank.match_result.matched_skills, vec!["Excel", "SQL"]);
    assert_eq!(frank.resume_results.matches["Excel"].score, 0.545);
    assert_eq!(frank.resume_results.matches["Excel"].examples, vec!["excell".to_string()]);

    let erin = &batch.candidates[1];
    assert_eq!(erin.name, "erin.docx");
    assert_eq!(
        erin.match_result.matched_skills,
        vec!["Data Analysis", "Pandas", "Python", "SQL"]
    );
    assert_eq!(erin.match_result.extra_skills, vec!["Power BI"]);
    assert_eq!(erin.match_result.match_score_percent, 66.67);
}

#[tokio::test]
async fn test_corrupt_archive_becomes_failed_candidate() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.zip");
    std::fs::write(&path, b"not a zip archive").unwrap();

    let mut manager = InputManager::new();
    let candidates = manager.collect_candidates(&[path]).await.unwrap();

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].display_name(), "broken.zip");
    assert!(candidates[0].error.as_deref().unwrap().contains("Archive error"));
}

#[tokio::test]
async fn test_end_to_end_directory_match() {
    let mut manager = InputManager::new();
    let jd_text = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let candidates = manager
        .collect_candidates(&[PathBuf::from("tests/fixtures/resumes")])
        .await
        .unwrap();

    let batch = analyzer().analyze(&jd_text, &candidates).unwrap();

    let jd_skills: Vec<&str> = batch.jd.present_skills().collect();
    assert_eq!(
        jd_skills,
        vec!["Communication", "Data Analysis", "Excel", "Pandas", "Python", "SQL"]
    );
    assert_eq!(batch.jd.matches["Excel"].count, 2);
    // "data analyst" twice, near enough to "data analysis"
    assert_eq!(batch.jd.matches["Data Analysis"].count, 2);
    assert_eq!(batch.jd.matches["Data Analysis"].score, 1.056);

    let alice = &batch.candidates[0];
    assert_eq!(alice.match_result.match_score_percent, 83.33);
    assert!(alice.match_result.matched_skills.contains(&"Data Analysis".to_string()));
    assert_eq!(alice.match_result.missing_skills, vec!["Communication"]);
    assert_eq!(alice.match_result.extra_skills, vec!["Tableau"]);
    assert_eq!(alice.profile.email.as_deref(), Some("alice.smith@example.com"));
    assert_eq!(alice.profile.experience_years, 4);

    let bob = &batch.candidates[1];
    assert_eq!(bob.match_result.matched_skills, vec!["Communication", "Excel"]);
    assert_eq!(bob.match_result.match_score_percent, 33.33);
    assert_eq!(bob.resume_results.matches["Communication"].count, 2);

    let carol = &batch.candidates[2];
    assert_eq!(carol.match_result.matched_skills, vec!["SQL"]);
    assert_eq!(carol.match_result.match_score_percent, 16.67);
    assert_eq!(
        carol.match_result.extra_skills,
        vec!["Machine Learning", "Tableau"]
    );
    assert_eq!(carol.resume_results.matches["Tableau"].examples, vec!["tableu".to_string()]);

    let dan = &batch.candidates[3];
    assert_eq!(dan.match_result.match_score_percent, 0.0);
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].index, 3);
    assert_eq!(batch.failures[0].name, "dan.pdf");

    let leaders: Vec<&str> = batch.leaderboard().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(leaders, vec!["alice.txt", "bob.md", "carol.txt", "dan.pdf"]);
}

#[tokio::test]
async fn test_staged_analysis_matches_direct_analysis() {
    let dir = tempfile::TempDir::new().unwrap();
    let store = StagingStore::new(dir.path());
    let mut manager = InputManager::new();

    let jd_text = manager
        .extract_text(Path::new("tests/fixtures/job_description.txt"))
        .await
        .unwrap();
    let candidates = manager
        .collect_candidates(&[
            PathBuf::from("tests/fixtures/resumes/alice.txt"),
            PathBuf::from("tests/fixtures/resumes/bob.md"),
        ])
        .await
        .unwrap();

    store.save_jd(&jd_text).unwrap();
    store.save_candidates(&candidates).unwrap();

    let staged_jd = store.load_jd().unwrap().unwrap();
    let staged_candidates = store.load_candidates().unwrap();

    let direct = analyzer().analyze(&jd_text, &candidates).unwrap();
    let staged = analyzer().analyze(&staged_jd, &staged_candidates).unwrap();
    assert_eq!(direct, staged);
}
