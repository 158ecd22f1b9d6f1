use criterion::{Criterion, black_box, criterion_group, criterion_main};

use wordgap::remote::types::{ArticleBundle, WordItem};
use wordgap::session::controller::build_exercise;
use wordgap::session::tokenizer::tokenize;

const WORDS: [&str; 10] = [
    "courage", "harvest", "lantern", "orbit", "meadow", "signal", "thunder", "voyage",
    "whisper", "anchor",
];

fn make_article(questions: usize) -> ArticleBundle {
    let mut content = String::new();
    for i in 0..questions {
        let word = WORDS[i % WORDS.len()];
        content.push_str("Some plain text before the blank, ");
        content.push_str(&format!("[{word},{word}s] "));
        if i % 8 == 7 {
            content.push('\n');
        }
    }
    ArticleBundle {
        title: "Benchmark".to_string(),
        content,
        word_bank: WORDS.iter().map(|w| WordItem::new(w, "")).collect(),
        ..ArticleBundle::default()
    }
}

fn bench_tokenize(c: &mut Criterion) {
    let article = make_article(500);

    c.bench_function("tokenize (500 markers)", |b| {
        b.iter(|| tokenize(black_box(&article.content)))
    });
}

fn bench_build_exercise(c: &mut Criterion) {
    let article = make_article(200);

    c.bench_function("build_exercise (200 markers)", |b| {
        b.iter(|| build_exercise(black_box(&article)))
    });
}

criterion_group!(benches, bench_tokenize, bench_build_exercise);
criterion_main!(benches);
