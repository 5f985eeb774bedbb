//! Crafter behavior against an in-memory world

mod common;

use common::*;
use proptest::prelude::*;
use rf_mapdata::MapData;
use rf_mapdata::examine::CrafterOption;
use rf_mapdata::itype::{FLAG_COOKED, FLAG_PROCESSING, Item};
use rf_mapdata::world::{Character, MapAccess, Tripoint};
use rf_units::{TimeDuration, TimePoint, Volume};

const RACK: Tripoint = Tripoint::new(3, 3, 0);
const BESIDE: Tripoint = Tripoint::new(2, 3, 0);

fn setup() -> (MapData, World) {
    let (data, diag) = load_data(&[BASE_DATA]);
    assert!(diag.is_empty(), "unexpected diagnostics: {:?}", diag.iter().collect::<Vec<_>>());
    let mut world = World::new();
    world.map.furn_set(RACK, furn(&data, "f_smoking_rack"));
    (data, world)
}

fn fill(world: &mut World, id: &str, count: usize) {
    for _ in 0..count {
        world.map.add_item(RACK, item(id, 1));
    }
}

fn count_at(world: &World, p: Tripoint, id: &str) -> usize {
    world
        .map
        .items(p)
        .iter()
        .filter(|it| it.type_id.as_str() == id)
        .count()
}

fn charges_at(world: &World, p: Tripoint, id: &str) -> i32 {
    world
        .map
        .items(p)
        .iter()
        .filter(|it| it.type_id.as_str() == id)
        .map(|it| it.charges)
        .sum()
}

fn guy_with_meat(count: usize) -> TestCharacter {
    (0..count).fold(TestCharacter::at(BESIDE), |guy, _| guy.with(item("meat", 1)))
}

/// Load `meat` and charcoal and start the rack at turn zero
fn started() -> (MapData, World) {
    let (data, mut world) = setup();
    fill(&mut world, "meat", 4);
    world.map.add_item(RACK, item("charcoal", 150));
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Start.retval());
    world.examine(&data, Some(&mut guy), RACK);
    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack_active"));
    (data, world)
}

#[test]
fn test_add_count_is_min_of_available_and_space() {
    let (data, mut world) = setup();
    let mut guy = guy_with_meat(10);
    world.ui.choose(CrafterOption::Add.retval()).choose(0);

    world.examine(&data, Some(&mut guy), RACK);

    // 2 L holds eight 250 ml chunks
    assert_eq!(world.ui.int_prompts, vec![("Insert how many of the chunk of meat?".to_string(), 8)]);
    assert_eq!(count_at(&world, RACK, "meat"), 8);
    assert_eq!(guy.count("meat"), 2);
    assert_eq!(guy.moves(), 100 - 8 * 10);
}

#[test]
fn test_add_count_accounts_for_contents() {
    let (data, mut world) = setup();
    fill(&mut world, "meat", 6);
    let mut guy = guy_with_meat(10);
    world.ui.choose(CrafterOption::Add.retval()).choose(0);

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.ui.int_prompts[0].1, 2);
    assert_eq!(count_at(&world, RACK, "meat"), 8);
}

#[test]
fn test_add_zero_cancels() {
    let (data, mut world) = setup();
    let mut guy = guy_with_meat(3);
    world
        .ui
        .choose(CrafterOption::Add.retval())
        .choose(0)
        .enter(Some(0));

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.ui.last_message(), Some("Never mind."));
    assert!(world.map.items(RACK).is_empty());
    assert_eq!(guy.count("meat"), 3);
    assert_eq!(guy.moves(), 100);
}

#[test]
fn test_add_without_candidates() {
    let (data, mut world) = setup();
    let mut guy = TestCharacter::at(BESIDE).with(item("rock", 1));
    world.ui.choose(CrafterOption::Add.retval());

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.ui.menus.len(), 1);
    assert_eq!(world.ui.last_message(), Some("Never mind."));
    assert_eq!(guy.count("rock"), 1);
}

#[test]
fn test_add_skips_rotten_items() {
    let (data, mut world) = setup();
    let mut rotten = item("meat", 1);
    rotten.relative_rot = 1.5;
    let mut guy = TestCharacter::at(BESIDE).with(rotten).with(item("meat", 1));
    world.ui.choose(CrafterOption::Add.retval()).choose(0);

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.ui.int_prompts[0].1, 1);
    assert_eq!(count_at(&world, RACK, "meat"), 1);
    assert!(world.map.items(RACK).iter().all(|it| !it.is_rotten()));
}

#[test]
fn test_menu_when_full_and_empty() {
    let (data, mut world) = setup();
    let mut guy = TestCharacter::at(BESIDE);
    world.examine(&data, Some(&mut guy), RACK);
    let menu = &world.ui.menus[0];
    assert_eq!(menu.title, "Do what with this smoking rack:");
    let start = menu.entry(CrafterOption::Start.retval()).unwrap();
    assert!(!start.enabled);
    assert_eq!(start.text, "Start processing (nothing to process)");
    assert!(!menu.entry(CrafterOption::Remove.retval()).unwrap().enabled);
    assert!(menu.entry(CrafterOption::Disassemble.retval()).unwrap().enabled);
    assert!(menu.entry(CrafterOption::RemoveFuel.retval()).is_none());
    assert_eq!(world.ui.last_message(), Some("Never mind."));

    fill(&mut world, "meat", 8);
    world.examine(&data, Some(&mut guy), RACK);
    let add = world.ui.menus[1].entry(CrafterOption::Add.retval()).unwrap();
    assert!(!add.enabled);
    assert_eq!(add.text, "Add items (full)");
}

#[test]
fn test_start_consumes_fuel_and_tags_payload() {
    let (data, world) = started();

    let items = world.map.items(RACK);
    let meat: Vec<&Item> = items.iter().filter(|it| it.type_id.as_str() == "meat").collect();
    assert_eq!(meat.len(), 4);
    assert!(meat.iter().all(|it| it.has_flag(FLAG_PROCESSING)));
    // 1 L of meat needs 10 fuel, the rack burns at least 100
    assert_eq!(charges_at(&world, RACK, "charcoal"), 50);

    let marker = items
        .iter()
        .find(|it| it.type_id.as_str() == "fake_smoke_plume")
        .unwrap();
    assert_eq!(marker.counter, TimeDuration::from_hours(6).turns());
    assert_eq!(marker.birthday, TimePoint::TURN_ZERO);
    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack_active"));
    assert_eq!(world.ui.last_message(), Some("You start the smoking rack."));
}

#[test]
fn test_start_rejects_foreign_items() {
    let (data, mut world) = setup();
    fill(&mut world, "meat", 2);
    fill(&mut world, "rock", 1);
    world.map.add_item(RACK, item("charcoal", 150));
    let before = world.map.items(RACK).to_vec();
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Start.retval());

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(
        world.ui.last_message(),
        Some("The smoking rack cannot be activated while it contains rock!")
    );
    assert_eq!(world.map.items(RACK), before.as_slice());
    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack"));
}

#[test]
fn test_start_needs_enough_fuel() {
    let (data, mut world) = setup();
    fill(&mut world, "meat", 2);
    world.map.add_item(RACK, item("charcoal", 99));
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Start.retval());

    world.examine(&data, Some(&mut guy), RACK);

    let start = world.ui.menus[0].entry(CrafterOption::Start.retval()).unwrap();
    assert!(!start.enabled);
    assert_eq!(start.text, "Start processing (not enough fuel)");
    assert_eq!(world.ui.last_message(), Some("Never mind."));
    assert_eq!(charges_at(&world, RACK, "charcoal"), 99);
}

#[test]
fn test_passive_tick_before_done_changes_nothing() {
    let (data, mut world) = started();
    let before = world.map.items(RACK).to_vec();
    world.now = TimePoint::from_turn(3_600);

    world.examine(&data, None, RACK);

    assert_eq!(world.map.items(RACK), before.as_slice());
    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack_active"));
}

#[test]
fn test_completion_produces_results() {
    let (data, mut world) = setup();
    fill(&mut world, "meat", 3);
    let mut filthy = item("meat", 1);
    filthy.set_flag("FILTHY");
    world.map.add_item(RACK, filthy);
    fill(&mut world, "fish_bones", 1);
    world.map.add_item(RACK, item("charcoal", 150));
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Start.retval());
    world.examine(&data, Some(&mut guy), RACK);

    world.now = TimePoint::TURN_ZERO + TimeDuration::from_hours(6);
    world.examine(&data, None, RACK);

    let items = world.map.items(RACK);
    let smoked: Vec<&Item> = items
        .iter()
        .filter(|it| it.type_id.as_str() == "meat_smoked")
        .collect();
    assert_eq!(smoked.len(), 4);
    for it in &smoked {
        assert_eq!(it.birthday, TimePoint::from_turn(6 * 3_600));
        assert_eq!(it.charges, 1);
        assert_eq!(it.recipe_charges, 1);
        assert!(it.has_flag(FLAG_COOKED));
        assert!(!it.has_flag(FLAG_PROCESSING));
        assert!((it.relative_rot - 0.125).abs() < 1e-9);
        assert_eq!(it.components.len(), 1);
        assert_eq!(it.components[0].type_id.as_str(), "meat");
        assert!(it.components[0].has_flag(FLAG_COOKED));
    }
    assert_eq!(smoked.iter().filter(|it| it.has_flag("FILTHY")).count(), 1);

    let bones: Vec<&Item> = items
        .iter()
        .filter(|it| it.type_id.as_str() == "fish_bones")
        .collect();
    assert_eq!(bones.len(), 1);
    assert!(!bones[0].has_flag(FLAG_PROCESSING));

    assert_eq!(count_at(&world, RACK, "meat"), 0);
    assert_eq!(count_at(&world, RACK, "fake_smoke_plume"), 0);
    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack"));
}

#[test]
fn test_examining_finished_rack_reports_completion() {
    let (data, mut world) = started();
    world.now = TimePoint::from_turn(7 * 3_600);
    let mut guy = TestCharacter::at(BESIDE);

    world.examine(&data, Some(&mut guy), RACK);

    // Only the menu from starting the rack was shown
    assert_eq!(world.ui.menus.len(), 1);
    assert_eq!(world.ui.last_message(), Some("The smoking rack has finished processing."));
    assert_eq!(count_at(&world, RACK, "meat_smoked"), 4);
    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack"));
}

#[test]
fn test_active_menu_offers_disable_only() {
    let (data, mut world) = started();
    let mut guy = guy_with_meat(2);
    world.ui.choose(CrafterOption::Add.retval());

    world.examine(&data, Some(&mut guy), RACK);

    let menu = world.ui.menus.last().unwrap();
    assert!(menu.entry(CrafterOption::Add.retval()).is_none());
    assert!(menu.entry(CrafterOption::Start.retval()).is_none());
    assert!(menu.entry(CrafterOption::Disable.retval()).unwrap().enabled);
    assert_eq!(world.ui.last_message(), Some("Never mind."));
    assert_eq!(guy.count("meat"), 2);
}

#[test]
fn test_disable_reverts_furniture() {
    let (data, mut world) = started();
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Disable.retval());

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack"));
    assert_eq!(count_at(&world, RACK, "fake_smoke_plume"), 0);
    assert_eq!(count_at(&world, RACK, "meat"), 4);
    assert!(world.map.items(RACK).iter().all(|it| !it.has_flag(FLAG_PROCESSING)));
}

#[test]
fn test_restart_after_disable_keeps_one_marker() {
    let (data, mut world) = started();
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Disable.retval());
    world.examine(&data, Some(&mut guy), RACK);

    world.map.add_item(RACK, item("charcoal", 100));
    world.now = TimePoint::from_turn(600);
    world.ui.choose(CrafterOption::Start.retval());
    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack_active"));
    assert_eq!(count_at(&world, RACK, "fake_smoke_plume"), 1);
    let marker = world
        .map
        .items(RACK)
        .iter()
        .find(|it| it.type_id.as_str() == "fake_smoke_plume")
        .unwrap();
    assert_eq!(marker.birthday, TimePoint::from_turn(600));
}

#[test]
fn test_active_without_items_is_reported() {
    let (data, mut world) = setup();
    world.map.furn_set(RACK, furn(&data, "f_smoking_rack_active"));
    let mut marker = item("fake_smoke_plume", 1);
    marker.counter = 100;
    world.map.add_item(RACK, marker);
    let mut guy = TestCharacter::at(BESIDE);

    world.examine(&data, Some(&mut guy), RACK);

    assert!(world.diag.contains("is active, but has no items in it"));
    assert_eq!(world.map.furn(RACK), furn(&data, "f_smoking_rack"));
}

#[test]
fn test_remove_items_and_fuel() {
    let (data, mut world) = setup();
    fill(&mut world, "meat", 2);
    world.map.add_item(RACK, item("charcoal", 40));
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Remove.retval());

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(count_at(&world, RACK, "meat"), 0);
    assert_eq!(count_at(&world, BESIDE, "meat"), 2);
    assert_eq!(charges_at(&world, RACK, "charcoal"), 40);
    assert!(world.ui.has_message("You remove the chunk of meat from the smoking rack."));
    assert_eq!(guy.moves(), 100 - 2 * 10);

    world.ui.choose(CrafterOption::RemoveFuel.retval());
    world.examine(&data, Some(&mut guy), RACK);
    let remove_fuel = world.ui.menus[1].entry(CrafterOption::RemoveFuel.retval()).unwrap();
    assert_eq!(remove_fuel.text, "Remove fuel (40)");
    assert!(world.map.items(RACK).is_empty());
    assert_eq!(charges_at(&world, BESIDE, "charcoal"), 40);
}

#[test]
fn test_reload_goes_to_hook() {
    let (data, mut world) = setup();
    let mut guy = TestCharacter::at(BESIDE).with(item("charcoal", 20));
    world.ui.choose(CrafterOption::Reload.retval());

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.hooks.reloads, vec![RACK]);
}

#[test]
fn test_disassemble_portable_rack() {
    let (data, mut world) = setup();
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Disassemble.retval());

    world.examine(&data, Some(&mut guy), RACK);

    assert!(world.map.furn(RACK).is_null());
    assert_eq!(count_at(&world, RACK, "rack_kit"), 1);
}

#[test]
fn test_inspect_lists_contents() {
    let (data, mut world) = setup();
    fill(&mut world, "meat", 1);
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Inspect.retval());

    world.examine(&data, Some(&mut guy), RACK);

    let popup = &world.ui.popups[0];
    assert!(popup.starts_with("There is a smoking rack here."));
    assert!(popup.contains("-> chunk of meat (1)"));
}

#[test]
fn test_inspect_reports_time_left() {
    let (data, mut world) = started();
    world.now = TimePoint::from_turn(TimeDuration::from_hours(3).turns());
    let mut guy = TestCharacter::at(BESIDE);
    world.ui.choose(CrafterOption::Inspect.retval());

    world.examine(&data, Some(&mut guy), RACK);

    let popup = &world.ui.popups[0];
    assert!(popup.starts_with("It is running."));
    assert!(popup.contains("It will take about 3 hours to finish."));
    assert!(popup.contains("-> smoke plume (1)"));
}

#[test]
fn test_add_weightless_items_takes_all_available() {
    let dust = r#"[{ "type": "COMESTIBLE", "id": "spice_dust", "name": "spice dust",
        "volume": "0 ml", "flags": ["SMOKABLE"] }]"#;
    let (data, _) = load_data(&[BASE_DATA, dust]);
    let mut world = World::new();
    world.map.furn_set(RACK, furn(&data, "f_smoking_rack"));
    let mut guy = (0..20).fold(TestCharacter::at(BESIDE), |guy, _| guy.with(item("spice_dust", 1)));
    world.ui.choose(CrafterOption::Add.retval()).choose(0);

    world.examine(&data, Some(&mut guy), RACK);

    assert_eq!(world.ui.int_prompts, vec![("Insert how many of the spice dust?".to_string(), 20)]);
    assert_eq!(count_at(&world, RACK, "spice_dust"), 20);
    assert_eq!(guy.count("spice_dust"), 0);
}

#[test]
fn test_inactive_call_without_character_is_reported() {
    let (data, mut world) = setup();
    world.examine(&data, None, RACK);
    assert!(world.diag.contains("called with no character"));
}

#[test]
fn test_crafter_finalize_diagnostics() {
    let text = r#"[{ "type": "furniture", "id": "f_kiln_broken", "name": "broken kiln",
        "description": "d", "symbol": "U", "color": "red", "move_cost_mod": -1,
        "required_str": -1,
        "examine_action": {
            "type": "crafter", "active": false, "portable": true,
            "furniture_transform": "f_kiln_lit", "processing_item": "fake_fire",
            "processed_flag": "FIREABLE", "max_volume": "10 L"
        } }]"#;
    let (_, diag) = load_data(&[BASE_DATA, text]);
    assert!(diag.contains("crafter has no valid furniture to transform into (f_kiln_lit is set)"));
    assert!(diag.contains("crafter processing item fake_fire does not exist"));
    assert!(diag.contains("crafter processed flag FIREABLE does not exist"));
    assert!(diag.contains("portable crafter has no disassemble_item"));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_add_respects_capacity(existing in 0usize..=8, available in 0usize..=12, requested in 0i32..=16) {
        let (data, mut world) = setup();
        fill(&mut world, "meat", existing);
        let mut guy = guy_with_meat(available);
        world
            .ui
            .choose(CrafterOption::Add.retval())
            .choose(0)
            .enter(Some(requested));

        world.examine(&data, Some(&mut guy), RACK);

        let used: Volume = world
            .map
            .items(RACK)
            .iter()
            .map(|it| it.volume(data.item_types()))
            .sum();
        prop_assert!(used <= Volume::from_liter(2));

        let fits = 8 - existing;
        let expected = available.min(fits).min(requested.max(0) as usize);
        prop_assert_eq!(count_at(&world, RACK, "meat"), existing + expected);
        prop_assert_eq!(guy.count("meat") as usize, available - expected);
    }
}
