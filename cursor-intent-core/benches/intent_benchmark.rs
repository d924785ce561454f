use criterion::{Criterion, black_box, criterion_group, criterion_main};
use cursor_intent_core::{
    DocumentContext, IntentConfig, IntentDetector, IntentRequest, Position,
};

const SOURCE: &str = r#"import { readFile } from 'fs/promises';

export async function load(path: string): Promise<string> {
  const raw = await readFile(path, 'utf8');
  return raw.trim();
}

export class Cache {
  private entries = new Map<string, string>();

  get(key: string): string | undefined {
    return this.entries.get(key);
  }

  set(key: string, value: string): void {
  }
}

// merge two caches into a new one
"#;

fn context() -> DocumentContext {
    DocumentContext {
        file_relative_path: "src/cache.ts".to_string(),
        prefix: SOURCE.to_string(),
        position: Position::new(SOURCE.lines().count(), 0),
        ..Default::default()
    }
}

/// Parse + resolve, the work done per suggestion request once caches are warm
fn benchmark_detect(c: &mut Criterion) {
    let Ok(runtime) = tokio::runtime::Runtime::new() else {
        return;
    };
    let detector = IntentDetector::new(IntentConfig::default());
    let context = context();
    let _ = runtime.block_on(detector.detect(&context));

    let mut group = c.benchmark_group("intent");
    group.bench_function("detect_warm", |b| {
        b.iter(|| runtime.block_on(detector.detect(black_box(&context))))
    });

    let Some(document) = runtime.block_on(detector.parser().parse_file(&context)) else {
        group.finish();
        return;
    };
    group.bench_function("resolve_only", |b| {
        b.iter(|| {
            detector.resolver().get_intent(black_box(&IntentRequest {
                document: &document,
                position: context.position,
                prefix: &context.prefix,
                suffix: &context.suffix,
            }))
        })
    });
    group.finish();
}

criterion_group!(benches, benchmark_detect);
criterion_main!(benches);
