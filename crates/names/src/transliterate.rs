//! Per-script transliteration into a simplified Latin phonetic form.
//!
//! Tables cover lowercase letters only; callers lowercase first. Letters with
//! diacritics are expected to be decomposed already (NFD), so `й`, `ё` and
//! accented Greek vowels reach these tables as their base letter.

/// Writing system of a single character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    Latin,
    Cyrillic,
    Greek,
    Arabic,
    Other,
}

impl Script {
    pub fn of(c: char) -> Self {
        match c {
            'a'..='z' | 'A'..='Z' | '\u{00C0}'..='\u{024F}' => Script::Latin,
            '\u{0400}'..='\u{04FF}' | '\u{0500}'..='\u{052F}' => Script::Cyrillic,
            '\u{0370}'..='\u{03FF}' | '\u{1F00}'..='\u{1FFF}' => Script::Greek,
            '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' => Script::Arabic,
            _ => Script::Other,
        }
    }
}

/// Transliterate every non-Latin letter of `text`; unknown characters pass
/// through.
pub fn transliterate(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        match Script::of(c) {
            Script::Greek => {
                if let Some(next) = chars.get(i + 1) {
                    if let Some(digraph) = greek_digraph(c, *next) {
                        out.push_str(digraph);
                        i += 2;
                        continue;
                    }
                }
                push_mapped(&mut out, c, greek(c));
            }
            Script::Cyrillic => push_mapped(&mut out, c, cyrillic(c)),
            Script::Arabic => push_mapped(&mut out, c, arabic(c)),
            Script::Latin | Script::Other => out.push(c),
        }
        i += 1;
    }

    out
}

fn push_mapped(out: &mut String, original: char, mapped: Option<&str>) {
    match mapped {
        Some(latin) => out.push_str(latin),
        None => out.push(original),
    }
}

fn cyrillic(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'ґ' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "e",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'і' => "i",
        'ї' => "i",
        'й' => "i",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ў' => "u",
        'ф' => "f",
        'х' => "kh",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "shch",
        'ъ' => "",
        'ы' => "y",
        'ь' => "",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

fn greek_digraph(first: char, second: char) -> Option<&'static str> {
    let latin = match (first, second) {
        ('ο', 'υ') => "ou",
        ('α', 'ι') => "ai",
        ('ε', 'ι') => "ei",
        ('ο', 'ι') => "oi",
        ('μ', 'π') => "b",
        ('ν', 'τ') => "d",
        ('γ', 'κ') => "g",
        ('γ', 'γ') => "ng",
        _ => return None,
    };
    Some(latin)
}

fn greek(c: char) -> Option<&'static str> {
    let latin = match c {
        'α' => "a",
        'β' => "v",
        'γ' => "g",
        'δ' => "d",
        'ε' => "e",
        'ζ' => "z",
        'η' => "i",
        'θ' => "th",
        'ι' => "i",
        'κ' => "k",
        'λ' => "l",
        'μ' => "m",
        'ν' => "n",
        'ξ' => "x",
        'ο' => "o",
        'π' => "p",
        'ρ' => "r",
        'σ' | 'ς' => "s",
        'τ' => "t",
        'υ' => "y",
        'φ' => "f",
        'χ' => "ch",
        'ψ' => "ps",
        'ω' => "o",
        _ => return None,
    };
    Some(latin)
}

fn arabic(c: char) -> Option<&'static str> {
    let latin = match c {
        'ا' | 'أ' | 'آ' | 'ى' | 'ة' => "a",
        'إ' => "i",
        'ب' => "b",
        'ت' | 'ط' => "t",
        'ث' => "th",
        'ج' => "j",
        'ح' | 'ه' => "h",
        'خ' => "kh",
        'د' | 'ض' => "d",
        'ذ' => "dh",
        'ر' => "r",
        'ز' | 'ظ' => "z",
        'س' | 'ص' => "s",
        'ش' => "sh",
        'ع' | 'ء' => "",
        'غ' => "gh",
        'ف' => "f",
        'ق' => "q",
        'ك' => "k",
        'ل' => "l",
        'م' => "m",
        'ن' => "n",
        'و' => "w",
        'ي' => "y",
        _ => return None,
    };
    Some(latin)
}
