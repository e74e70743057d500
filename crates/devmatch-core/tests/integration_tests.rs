//! DevMatch Core Integration Tests

use devmatch_core::{
    Error,
    domain::matching::{ExperienceFit, MatchResultRepository},
    prelude::*,
    storage::{DatabaseConfig, SeedReport, seed_if_empty},
};
use tempfile::TempDir;

async fn file_database(dir: &TempDir) -> Database {
    Database::new(DatabaseConfig::with_path(dir.path().join("devmatch.db")))
        .await
        .expect("Failed to open database")
}

#[tokio::test]
async fn test_developer_round_trip_across_reopen() {
    let dir = TempDir::new().unwrap();

    let developer = Developer::with_details("Ana", "ana@x.com", ExperienceLevel::Advanced);
    {
        let db = file_database(&dir).await;
        DeveloperRepository::new(&db).create(&developer).await.unwrap();
        db.close().await;
    }

    let db = file_database(&dir).await;
    let reloaded = DeveloperRepository::new(&db)
        .get(developer.id())
        .await
        .unwrap()
        .expect("Developer should survive reopening");

    assert_eq!(reloaded.id(), developer.id());
    assert_eq!(reloaded.name(), "Ana");
    assert_eq!(reloaded.email(), Some("ana@x.com"));
    assert_eq!(reloaded.experience_level(), Some(ExperienceLevel::Advanced));
    assert_eq!(reloaded.bio(), None);
    assert_eq!(reloaded.location(), None);
    assert_eq!(reloaded.github_profile(), None);
}

#[tokio::test]
async fn test_experience_lifecycle() {
    let db = Database::in_memory().await.unwrap();
    let repo = DeveloperRepository::new(&db);

    let mut developer = Developer::new("Lucía Martínez");
    let tutoring = Experience::new("Private math tutor").with_category("work");
    let tutoring_id = tutoring.id();
    developer.add_experience(tutoring);
    repo.create(&developer).await.unwrap();

    developer
        .experience_mut(&tutoring_id)
        .expect("Experience should be owned")
        .set_description("Private math tutor for 4 years");
    repo.save(&developer).await.unwrap();

    let reloaded = repo.get(developer.id()).await.unwrap().unwrap();
    assert_eq!(
        reloaded.experience(&tutoring_id).unwrap().description(),
        "Private math tutor for 4 years"
    );

    developer.remove_experience(&tutoring_id);
    repo.save(&developer).await.unwrap();
    let reloaded = repo.get(developer.id()).await.unwrap().unwrap();
    assert_eq!(reloaded.experience_count(), 0);
}

#[tokio::test]
async fn test_seeded_matching_workflow() {
    let db = Database::in_memory().await.unwrap();
    let report: SeedReport = seed_if_empty(&db).await.unwrap();
    assert_eq!(report.developers, 3);

    let projects = ProjectRepository::new(&db).list(None).await.unwrap();
    let fitness = projects
        .iter()
        .find(|p| p.project_type() == ProjectType::Mobile)
        .expect("Mobile project should be seeded");

    let service = MatchingService::new(&db);
    let candidates = service
        .candidates(fitness.id(), MatchOptions::default())
        .await
        .unwrap();
    assert_eq!(candidates.len(), 3);

    let best = &candidates[0];
    assert_eq!(best.developer_name, "Carlos Pérez");
    assert_eq!(best.technical_match, 100.0);
    assert_eq!(best.fit, ExperienceFit::Exact);
    assert!(best.missing.is_empty());

    service.record(fitness.id(), &candidates[..1]).await.unwrap();
    let results = MatchResultRepository::new(&db)
        .list_for_project(fitness.id())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].developer_id, best.developer_id);
}

#[tokio::test]
async fn test_shared_technology_lifetime() {
    let db = Database::in_memory().await.unwrap();
    let technologies = TechnologyRepository::new(&db);
    let java = technologies.get_or_create("Java", Some("backend")).await.unwrap();

    let mut project = Project::new(
        "Coffee shop ordering system",
        "Orders and deliveries",
        ExperienceLevel::Intermediate,
        ProjectType::Web,
    );
    project.add_required_technology(java.id());
    ProjectRepository::new(&db).create(&project).await.unwrap();

    let mut ana = Developer::new("Ana");
    let mut carlos = Developer::new("Carlos");
    ana.add_skill(java.id());
    carlos.add_skill(java.id());
    let developers = DeveloperRepository::new(&db);
    developers.create(&ana).await.unwrap();
    developers.create(&carlos).await.unwrap();

    assert!(matches!(
        technologies.delete(java.id()).await,
        Err(Error::TechnologyInUse { developers: 2, projects: 1, .. })
    ));

    ProjectRepository::new(&db).delete(project.id()).await.unwrap();
    developers.delete(ana.id()).await.unwrap();

    let carlos = developers.get(carlos.id()).await.unwrap().unwrap();
    assert!(carlos.has_skill(&java.id()));

    developers.delete(carlos.id()).await.unwrap();
    technologies.delete(java.id()).await.unwrap();
    assert_eq!(technologies.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_validation_errors_are_collected() {
    let db = Database::in_memory().await.unwrap();

    let developer = Developer::new("")
        .with_email("not-an-email")
        .with_location("x".repeat(201));
    let err = DeveloperRepository::new(&db).create(&developer).await.unwrap_err();

    let Error::Validation(errors) = err else {
        panic!("Expected validation errors");
    };
    assert_eq!(errors.len(), 3);
    assert!(errors.has("name", &Constraint::Required));
    assert!(errors.has("email", &Constraint::Email));
    assert!(errors.has("location", &Constraint::Length { min: 0, max: 0 }));
}

#[tokio::test]
async fn test_migration_status_on_fresh_database() {
    let db = Database::in_memory().await.unwrap();
    let status = db.migration_status().await.unwrap();
    assert!(!status.needs_migration);
    assert_eq!(status.current_version, devmatch_core::storage::CURRENT_VERSION);
    db.health_check().await.unwrap();
}
