//! Roster text parser tests against the built-in and custom rosters

use pretty_assertions::assert_eq;
use rollcall::config::RollcallConfig;
use rollcall::parser::{parse_roster_text, RosterParser};
use rollcall::types::ProgramAbsences;

fn parse(text: &str) -> Vec<ProgramAbsences> {
    let config = RollcallConfig::builtin().unwrap();
    parse_roster_text(text, &config.abbreviations, &config.roster).unwrap()
}

fn record(program: &str, names: &[&str]) -> ProgramAbsences {
    ProgramAbsences::new(program, names.iter().map(|n| n.to_string()).collect())
}

// ═══════════════════════════════════════════════════════════════════════════
// SINGLE GROUP
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_abbreviated_label_resolves_full_program() {
    assert_eq!(
        parse("机械2班：张三、李四（缺勤）"),
        vec![record("24机械设计制造及其自动化", &["张三", "李四"])]
    );
}

#[test]
fn test_half_width_marker_and_comma_names() {
    assert_eq!(
        parse("计科3班：王五,赵六(缺勤)"),
        vec![record("24计算机科学与技术", &["王五", "赵六"])]
    );
}

#[test]
fn test_full_program_name_with_year() {
    assert_eq!(
        parse("24软件工程专业2班：孙八（缺勤）"),
        vec![record("24软件工程", &["孙八"])]
    );
}

#[test]
fn test_chinese_class_number() {
    assert_eq!(
        parse("通信二班：钱七（缺勤）"),
        vec![record("24通信工程", &["钱七"])]
    );
}

// ═══════════════════════════════════════════════════════════════════════════
// MULTIPLE GROUPS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_groups_keep_first_seen_order() {
    let text = "土木1班：赵六（缺勤）\n机械2班：张三（缺勤）\n电气1班：王五（缺勤）";
    let programs: Vec<String> = parse(text).into_iter().map(|r| r.program).collect();
    assert_eq!(
        programs,
        vec!["24土木工程", "24机械设计制造及其自动化", "24电气工程及其自动化"]
    );
}

#[test]
fn test_two_classes_of_one_program_are_merged() {
    let text = "机械1班：张三（缺勤）；机制3班：李四、王五（缺勤）";
    assert_eq!(
        parse(text),
        vec![record("24机械设计制造及其自动化", &["张三", "李四", "王五"])]
    );
}

#[test]
fn test_chat_export_file() {
    let text = std::fs::read_to_string("test-data/monday.txt").unwrap();
    assert_eq!(
        parse(&text),
        vec![
            record("24机械设计制造及其自动化", &["张三", "李四"]),
            record("24计算机科学与技术", &["周九"]),
            record("24软件工程", &["孙八"]),
        ]
    );
}

#[test]
fn test_unknown_program_is_still_returned() {
    let text = std::fs::read_to_string("test-data/tuesday.txt").unwrap();
    let records = parse(&text);
    assert_eq!(records.len(), 3);
    assert_eq!(records[2], record("23哲学", &["吴十"]));
}

// ═══════════════════════════════════════════════════════════════════════════
// NOTHING TO REPORT
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_empty_and_chatter_inputs() {
    assert!(parse("").is_empty());
    assert!(parse("   \n\n").is_empty());
    assert!(parse("收到\n好的").is_empty());
}

#[test]
fn test_all_present_message_is_ignored() {
    assert!(parse("电气1班：全员到齐").is_empty());
}

// ═══════════════════════════════════════════════════════════════════════════
// CUSTOM ROSTER
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_custom_roster_abbreviations() {
    let yaml = std::fs::read_to_string("test-data/small_roster.yaml").unwrap();
    let config = RollcallConfig::from_yaml_str(&yaml).unwrap();
    let parser = RosterParser::new(&config.abbreviations, &config.roster).unwrap();

    assert_eq!(
        parser.parse("哲学1班：吴十（缺勤）"),
        vec![record("24哲学", &["吴十"])]
    );
    // Not an abbreviation here, so the year fallback applies
    assert_eq!(
        parser.parse("24电气1班：王五（缺勤）"),
        vec![record("24电气", &["王五"])]
    );
}
