//! Built-in packing templates
//!
//! A fixed, ordered library of the user's personal packing lists, one per trip
//! type. Compiled in; never edited at runtime.

use crate::domain::{RawCategory, RawItem};

/// Template that applies to virtually every trip, and the fallback selection
pub const BASELINE: &str = "תמיד";

type TemplateDef = (&'static str, &'static [(&'static str, &'static [&'static str])]);

static LIBRARY: &[TemplateDef] = &[
    (
        "תמיד",
        &[
            (
                "ציוד חיוני",
                &[
                    "מזוודת ציוד שחורה",
                    "פקל קפה",
                    "צידנית גדולה",
                    "שישיית מים",
                    "אוכל (צידנית)",
                    "אוכל יבש (חטיפים)",
                    "מטען נייד",
                    "אולר",
                    "כובעים",
                    "רחפן",
                    "אלכוהול",
                    "בגדים להחלפה",
                ],
            ),
            ("אישי", &["תיק שחור אישי", "משחקים לנסיעה / ספר", "רישיון נהיגה ונשק", "מנטה מסטיק"]),
        ],
    ),
    (
        "טיול שטח",
        &[(
            "ציוד רכב ושטח",
            &[
                "רישיון נהיגה ונשק",
                "מכשירי קשר",
                "בגדי החלפה",
                "מגפי בוץ",
                "מפתח ספייר לרכב",
                "מיכל אוויר למילוי צמיגים + אקדח",
            ],
        )],
    ),
    (
        "מקורות מים",
        &[(
            "ציוד מים",
            &["תיק ים, מצופים, שנורקלים ומשקפות", "בגדים להחלפה", "מצלמה תת מימית", "סנפירים"],
        )],
    ),
    (
        "לינה - כללי",
        &[
            ("ציוד לינה", &["מזוודת בגדים לילדים", "מזוודת בגדים להורים", "מגן מזרן לזוזו"]),
            (
                "היגיינה ורחצה",
                &[
                    "תיק רחצה אילו",
                    "תיק רחצה כבש + מגבות",
                    "תיק רחצה ילדים + מגבות",
                    "מגבונים ונייר טואלט",
                    "איפור - כבש",
                ],
            ),
            (
                "שונות",
                &[
                    "מנגל + בלון גז",
                    "תיק תרופות",
                    "מטעני חשמל",
                    "פנס ותאורה",
                    "מכונת נספרסו",
                    "נוהל סגירת בית",
                ],
            ),
        ],
    ),
    (
        "לינת שטח",
        &[
            (
                "ציוד קמפינג",
                &[
                    "אוהל + מזרנים",
                    "כריות + מצעים + שמיכות",
                    "ציליה שחורה גדולה",
                    "משטחים לאש",
                    "שק שינה",
                    "מיכל מים שחור עגול",
                    "מאווררי כיס (ורוד ושחור)",
                    "מאוורר נייד עם מילוי קרח ומים",
                ],
            ),
            ("בישול שדה", &["מנגל + בלון גז", "סאג' + בצק", "פויקה", "צ'ימיגג", "צידנית קרח קטנה"]),
            ("חשמל ותאורה", &["סוללת ליתיום", "סוללות AAA / AA", "POWERBANKS"]),
        ],
    ),
    (
        "טיסה",
        &[
            (
                "הכנות לטיסה",
                &[
                    "הזמנת טיסות",
                    "און ליין צ'קאין",
                    "הזמנת מלון",
                    "ביטוח נסיעות",
                    "חבילת סלולר",
                    "טלפונים לחירום",
                    "ספריית מסמכים דיגיטלית שמורה",
                    "שמירת מפות אופליין",
                    "הגדרת OOO במייל",
                    "Smart tag למזוודה",
                ],
            ),
            ("כסף ומסמכים", &["כסף מזומן"]),
        ],
    ),
    (
        "יאכטה",
        &[
            (
                "ציוד ליאכטה",
                &[
                    "מקינטה + מקציף + קפה",
                    "מקציף חשמלי לחלב",
                    "ממיר מתח 12V ל-220V",
                    "כבל AUX",
                    "רישיון יאכטה",
                    "נעלי מים",
                    "סנדלים",
                    "מחזיקי סמארטפון להגה",
                    "וסת גז וצנרת",
                    "קונקטורים לצינור מים",
                    "ערסל פירות וירקות",
                ],
            ),
            (
                "ביגוד והגנה",
                &["בגדי ספורט", "הגנות מהשמש (חולצה, כובע, משקפי שמש, קרם הגנה)"],
            ),
            (
                "בטיחות וחירום",
                &[
                    "תיק חירום",
                    "לדרמן / כלי רב תכליתי",
                    "קיט חירום - בוקסות, איזולירבנד",
                    "צילום הספינה בצ'ק-אין (לביטוח)",
                ],
            ),
            (
                "בידור ופנאי",
                &[
                    "הורדת מוזיקה לאופליין",
                    "ציוד צלילה חופשית",
                    "קלפים",
                    "רמקול נייד",
                    "תאורת אווירה (גרילנדה USB)",
                ],
            ),
        ],
    ),
    (
        "חו\"ל עם ילדים",
        &[
            ("ציוד לילדים", &["צמידי זיהוי לילדים", "ערכת תיקון ואחזקה לעגלה", "בוסטר לרכב לזוזו"]),
            (
                "הכנות וכללי",
                &[
                    "אלכוהול מהדיוטי פרי",
                    "סימונים למזוודות ותיקים",
                    "הטבת טרום טיסה (לאונג')",
                    "כרטיסי אשראי רלוונטיים (הייטקזון)",
                ],
            ),
            (
                "אלקטרוניקה ובידור",
                &["לפטופ", "סרטים שהורדו מראש", "כבלים לחיבור לטלוויזיה", "מטען לגרמין"],
            ),
        ],
    ),
];

/// All template names, in definition order
pub fn names() -> Vec<&'static str> {
    LIBRARY.iter().map(|(name, _)| *name).collect()
}

/// Check whether a template exists
pub fn contains(name: &str) -> bool {
    LIBRARY.iter().any(|(n, _)| *n == name)
}

/// Look up a template's categories; every item is tagged user
///
/// An unknown name yields `None`, which callers treat as contributing nothing.
pub fn lookup(name: &str) -> Option<Vec<RawCategory>> {
    let (_, categories) = LIBRARY.iter().find(|(n, _)| *n == name)?;
    Some(
        categories
            .iter()
            .map(|(category, items)| RawCategory::new(*category, items.iter().map(|i| RawItem::user(*i)).collect()))
            .collect(),
    )
}
