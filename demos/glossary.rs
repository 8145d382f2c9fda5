use rangebuckets::{
    Ascending, BucketStore, Buckets, CaseInsensitive, SeqBuckets, Unique, ValueOrder,
};
use std::env;
use std::fmt;
use std::ops::Range;

const WORDS: &[&str] = &[
    "apple", "Banana", "avocado", "cherry", "Apple", "blueberry", "mango", "Nectarine", "olive",
    "papaya", "mango", "quince", "Olive", "peach",
];

#[derive(Debug)]
struct NoNextLetter(char);

impl fmt::Display for NoNextLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no key follows {:?}", self.0)
    }
}

impl std::error::Error for NoNextLetter {}

// The single-key range holding words that start with `word`'s first letter.
fn letter_of(word: &str) -> Result<Option<Range<char>>, NoNextLetter> {
    let Some(first) = word.chars().next() else {
        return Ok(None);
    };
    let first = first.to_uppercase().next().unwrap_or(first);
    let next = char::from_u32(u32::from(first) + 1).ok_or(NoNextLetter(first))?;
    Ok(Some(first..next))
}

type Glossary<C, S> = Buckets<char, &'static str, Ascending, Unique<C>, S>;

fn fill<C, S>(glossary: &mut Glossary<C, S>) -> Result<(), NoNextLetter>
where
    C: ValueOrder<&'static str>,
    S: BucketStore<char, Ascending, Vec<&'static str>>,
{
    for word in WORDS {
        if let Some(letter) = letter_of(word)? {
            glossary.spread(letter.start, letter.end, *word);
        }
    }
    Ok(())
}

fn print<C, S>(title: &str, glossary: &Glossary<C, S>)
where
    C: ValueOrder<&'static str>,
    S: BucketStore<char, Ascending, Vec<&'static str>>,
{
    println!("{}", title);
    for bucket in glossary.iter() {
        println!("  {}: {}", bucket.low(), bucket.values().join(", "));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut exact: SeqBuckets<char, &str, Ascending, Unique> = SeqBuckets::new();
    fill(&mut exact)?;
    print("Every spelling:", &exact);

    let mut folded: SeqBuckets<char, &str, Ascending, Unique<CaseInsensitive>> = SeqBuckets::new();
    fill(&mut folded)?;
    print("Ignoring case:", &folded);

    // Only the letters M to O, inclusive.
    let mut middle: SeqBuckets<char, &str, Ascending, Unique<CaseInsensitive>> =
        SeqBuckets::constrained('M', 'P')?;
    fill(&mut middle)?;
    print("M to O:", &middle);

    // A letter given on the command line must have a key after it.
    if let Some(word) = env::args().nth(1) {
        match letter_of(&word)? {
            Some(letter) => println!("{} files under {}", word, letter.start),
            None => println!("nothing to file"),
        }
    }
    Ok(())
}
