fn main() {
    // Only run linker script setup for hardware builds
    #[cfg(feature = "hardware")]
    {
        use std::env;
        use std::fs::File;
        use std::io::Write;
        use std::path::PathBuf;

        // Put `memory.x` in our output directory and ensure it's on the linker search path.
        let out = &PathBuf::from(env::var_os("OUT_DIR").unwrap());
        let memory_x = include_bytes!("../../memory.x");

        File::create(out.join("memory.x"))
            .unwrap()
            .write_all(memory_x)
            .unwrap();

        println!("cargo:rustc-link-search={}", out.display());
        println!("cargo:rerun-if-changed=../../memory.x");

        // Link `<id>.wav` files from $SAMPLE_DIR into the image as the sample store.
        let mut entries = Vec::new();
        if let Some(dir) = env::var_os("SAMPLE_DIR") {
            let dir = PathBuf::from(dir);
            println!("cargo:rerun-if-changed={}", dir.display());
            for entry in std::fs::read_dir(&dir).unwrap().flatten() {
                let path = entry.path();
                let id = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_suffix(".wav"))
                    .and_then(|stem| stem.parse::<u8>().ok());
                if let Some(id) = id {
                    entries.push((id, path.canonicalize().unwrap()));
                }
            }
        }
        entries.sort();

        let mut samples = File::create(out.join("samples.rs")).unwrap();
        writeln!(samples, "static SAMPLES: &[(u8, &[u8])] = &[").unwrap();
        for (id, path) in &entries {
            writeln!(samples, "    ({id}, include_bytes!({:?})),", path.display().to_string()).unwrap();
        }
        writeln!(samples, "];").unwrap();
    }

    println!("cargo:rerun-if-env-changed=SAMPLE_DIR");
    println!("cargo:rerun-if-changed=build.rs");
}
