use venture_sim::store::Workspace;
use venture_sim::{
    compose, Allocation, FixedJitter, MarketingChannel, RiskCategory, SimError, SimulationInput,
};

#[test]
fn favorites_are_unique_and_ordered() {
    let workspace = Workspace::in_memory();
    assert!(workspace.favorites.add("Reusable Eco Bag Brand").unwrap());
    assert!(workspace.favorites.add("Weekend Coding Bootcamp").unwrap());
    assert!(!workspace.favorites.add("Reusable Eco Bag Brand").unwrap());

    assert_eq!(
        workspace.favorites.list().unwrap(),
        vec!["Reusable Eco Bag Brand", "Weekend Coding Bootcamp"]
    );
    assert!(matches!(
        workspace.favorites.add("  "),
        Err(SimError::InvalidInput(_))
    ));
}

#[test]
fn last_run_is_overwritten_wholesale() {
    let workspace = Workspace::in_memory();
    assert_eq!(workspace.last_run.load().unwrap(), None);

    let mut input = SimulationInput {
        idea_id: "campus-tutor".to_string(),
        idea_risk: RiskCategory::Medium,
        idea_market: "edu".to_string(),
        budget: 20_000.0,
        allocation: Allocation::default(),
        team: Default::default(),
        marketing: MarketingChannel::Hybrid,
    };
    let first = compose(&input, &mut FixedJitter(0)).unwrap();
    workspace.last_run.store(&first).unwrap();

    input.allocation = Allocation::new(10.0, 5.0, 20.0);
    let second = compose(&input, &mut FixedJitter(0)).unwrap();
    workspace.last_run.store(&second).unwrap();

    assert_eq!(workspace.last_run.load().unwrap(), Some(second));
}

#[test]
fn contacts_require_every_field() {
    let workspace = Workspace::in_memory();
    for (name, email, msg) in [("", "a@b.c", "hi"), ("Sana", " ", "hi"), ("Sana", "a@b.c", "\n")] {
        assert!(matches!(
            workspace.contacts.submit(name, email, msg),
            Err(SimError::InvalidInput(_))
        ));
    }
    assert!(workspace.contacts.list().unwrap().is_empty());
}

#[test]
fn contacts_keep_duplicates_newest_first() {
    let workspace = Workspace::in_memory();
    workspace.contacts.submit(" Sana ", "sana@example.com", "Hello").unwrap();
    workspace.contacts.submit("Sana", "sana@example.com", "Hello").unwrap();
    workspace.contacts.submit("Omar", "omar@example.com", "Pricing?").unwrap();

    let contacts = workspace.contacts.list().unwrap();
    assert_eq!(contacts.len(), 3);
    assert_eq!(contacts[0].name, "Omar");
    assert_eq!(contacts[2].name, "Sana");
    assert!(contacts[0].date >= contacts[1].date);
}
