use kdl::{KdlDocument, KdlValue};
use once_cell::sync::Lazy;

pub const FALLBACK_LANG: &str = "en_US";

static POT: Lazy<KdlDocument> = Lazy::new(|| {
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res/pot.kdl"))
        .parse()
        .expect("pot.kdl failed to parse")
});

static LANG: Lazy<String> = Lazy::new(|| {
    let lang = std::env::var("LANGUAGE")
        .or_else(|_| std::env::var("LANG"))
        .unwrap_or_else(|_| String::from(FALLBACK_LANG));
    strip_encoding(&lang).to_string()
});

/// `en_US.UTF-8` -> `en_US`, `de_DE@euro` -> `de_DE`. `LANGUAGE` may list several, take the first.
fn strip_encoding(lang: &str) -> &str {
    lang.split([':', '.', '@']).next().unwrap_or(lang)
}

macro_rules! messages {
    ($($variant:ident),* $(,)?) => {
        #[derive(Clone, Copy, Debug)]
        pub enum Message {
            $($variant),*
        }

        impl Message {
            #[cfg(test)]
            fn all_strs() -> &'static [&'static str] {
                &[$(stringify!($variant)),*]
            }

            fn as_str(&self) -> &'static str {
                use Message::*;
                match self {
                    $($variant => stringify!($variant)),*
                }
            }
        }
    };
}

messages!(
    CouldNotOpenFile,
    CouldNotSaveFile,
    CouldNotOpenConfigFile,
    RemoveAllStrokes,
    NothingCollected,
    MissingLabels,
);

#[macro_export]
macro_rules! s {
    ($variant:ident) => {
        $crate::i18n::get_str($crate::i18n::Message::$variant)
    };
    (&$variant:ident) => {
        $crate::i18n::get_str($crate::i18n::Message::$variant).as_str()
    };
}

fn lookup<'pot>(pot: &'pot KdlDocument, lang: &str, key: Message) -> Option<&'pot str> {
    pot.get(lang)?
        .children()?
        .get(key.as_str())?
        .entries()
        .first()
        .map(|entry| entry.value())
        .and_then(KdlValue::as_string)
}

pub fn get_str(key: Message) -> String {
    let pot = &*POT;

    lookup(pot, &LANG, key)
        .or_else(|| lookup(pot, FALLBACK_LANG, key))
        .unwrap_or_else(|| {
            tracing::warn!("no string for {}", key.as_str());
            key.as_str()
        })
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_language_has_every_message() {
        let pot = &*POT;
        let required = Message::all_strs();

        for lang in pot.nodes() {
            let children = lang
                .children()
                .unwrap()
                .nodes()
                .iter()
                .map(|node| {
                    assert!(
                        !node.entries().is_empty(),
                        "language {} missing content for message {}",
                        lang.name(),
                        node.name()
                    );

                    node.name().value().to_string()
                })
                .collect::<HashSet<_>>();

            for required in required {
                assert!(
                    children.contains(*required),
                    "language {} missing message {}",
                    lang.name(),
                    required
                );
            }
        }
    }

    #[test]
    fn fallback_language() {
        assert_eq!(
            lookup(&POT, FALLBACK_LANG, Message::CouldNotOpenFile),
            Some("Could not open file.")
        );
        assert_eq!(lookup(&POT, "xx_XX", Message::CouldNotOpenFile), None);
    }

    #[test]
    fn encodings_stripped() {
        assert_eq!(strip_encoding("en_US.UTF-8"), "en_US");
        assert_eq!(strip_encoding("zh_CN:en_US"), "zh_CN");
        assert_eq!(strip_encoding("de_DE@euro"), "de_DE");
        assert_eq!(strip_encoding("C"), "C");
    }
}
