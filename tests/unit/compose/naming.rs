use super::*;

#[test]
fn strips_unsafe_characters_and_appends_id_prefix() {
    assert_eq!(
        output_file_name("What?! A \"great\" day: 100%", "abcdef123456"),
        "What A great day 100_abcdef12.mp4"
    );
}

#[test]
fn empty_title_falls_back_to_short() {
    assert_eq!(output_file_name("?!./", "xy"), "short_xy.mp4");
    assert_eq!(output_file_name("   ", "12345678"), "short_12345678.mp4");
}

#[test]
fn long_titles_are_cut_to_ninety_chars() {
    let title = "a".repeat(200);
    let name = output_file_name(&title, "id");
    assert_eq!(name, format!("{}_id.mp4", "a".repeat(90)));
}

#[test]
fn keeps_dashes_underscores_and_unicode_letters() {
    assert_eq!(output_file_name(" Café-au_lait ", "Z"), "Café-au_lait_Z.mp4");
}
