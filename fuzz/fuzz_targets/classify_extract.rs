#![no_main]

use libfuzzer_sys::fuzz_target;
use logsieve_log_pipeline::{ExtractorSet, FormatClassifier, Grammars};

fuzz_target!(|data: &[u8]| {
    let Ok(grammars) = Grammars::compile() else {
        return;
    };
    let classifier = FormatClassifier::new(&grammars);
    let extractors = ExtractorSet::new(&grammars);

    let line = String::from_utf8_lossy(data);
    let tag = classifier.classify(&line);
    if tag.is_known() {
        // 분류된 형식은 반드시 그 형식의 검사를 통과해야 한다
        assert!(classifier.satisfies(tag, &line));
        let _ = extractors.extract(tag, &line);
    }
});
