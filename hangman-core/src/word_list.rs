use hangman_types::WordEntry;

/// Letters offered by the on-screen keyboard, Polish alphabet order.
pub const ALPHABET: &str = "AĄBCĆDEĘFGHIJKLŁMNŃOÓPQRSŚTUVWXYZŹŻ";

// (word, category, hint)
const BUILTIN_WORDS: &[(&str, &str, &str)] = &[
    ("SŁOŃ", "Zwierzęta", "Największe zwierzę lądowe"),
    ("ŻYRAFA", "Zwierzęta", "Najwyższe zwierzę na świecie"),
    ("PINGWIN", "Zwierzęta", "Ptak który nie lata ale pływa"),
    ("POLSKA", "Kraje", "Nasz kraj"),
    ("FRANCJA", "Kraje", "Kraj wieży Eiffla"),
    ("CHINY", "Kraje", "Produkuje wszystko"),
    ("PIZZA", "Jedzenie", "Włoska potrawa z ciastem"),
    ("SUSHI", "Jedzenie", "Japońska potrawa z ryżem"),
    ("PIEROGI", "Jedzenie", "Tradycyjne polskie danie"),
    ("PIŁKA", "Sport", "Podstawowy sprzęt w wielu sportach"),
    ("TENIS", "Sport", "Gra z rakietą"),
    ("KOMPUTER", "Nauka", "Urządzenie elektroniczne"),
    ("INTERNET", "Nauka", "Globalna sieć"),
    ("ATOM", "Nauka", "Podstawowa jednostka materii"),
];

/// Word bank loaded into an empty repository on first start.
pub fn builtin_words() -> Vec<WordEntry> {
    BUILTIN_WORDS
        .iter()
        .map(|(word, category, hint)| WordEntry {
            word: word.to_string(),
            category: category.to_string(),
            hint: Some(hint.to_string()),
        })
        .collect()
}

/// Uppercase a single guessed character.
///
/// Characters whose uppercase form spans several code points (`ß`) are kept
/// as typed; they can never match a stored word and simply count as a miss.
pub fn normalize_letter(letter: char) -> char {
    let mut upper = letter.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => letter,
    }
}
