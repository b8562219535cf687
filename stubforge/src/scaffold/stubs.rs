//! Built-in stub templates
//!
//! Stubs are plain text with `{{placeholder}}` tokens and nothing else. Each
//! one can be replaced by a `<id>.stub` file in the configured stub
//! directory.

/// Eloquent model
pub const MODEL_STUB: &str = r"<?php

namespace {{namespace}};

{{imports}}

class {{class}} extends Model
{
    use HasFactory;

    protected $table = '{{table}}';

    /**
     * The attributes that are mass assignable.
     *
     * @var list<string>
     */
    protected $fillable = [{{fillable}}];

    /**
     * The attributes that should be hidden for serialization.
     *
     * @var list<string>
     */
    protected $hidden = [{{hidden}}];

    /**
     * Get the attributes that should be cast.
     *
     * @return array<string, string>
     */
    protected function casts(): array
    {
        return [
{{casts}}
        ];
    }
{{relations}}
}
";

/// Create-table migration
pub const MIGRATION_STUB: &str = r"<?php

use Illuminate\Database\Migrations\Migration;
use Illuminate\Database\Schema\Blueprint;
use Illuminate\Support\Facades\Schema;

return new class extends Migration
{
    /**
     * Run the migrations.
     */
    public function up(): void
    {
        Schema::create('{{table}}', function (Blueprint $table) {
            $table->id();
{{columns}}
            $table->timestamps();
        });
    }

    /**
     * Reverse the migrations.
     */
    public function down(): void
    {
        Schema::dropIfExists('{{table}}');
    }
};
";

/// Built-in stubs as `(id, source)` pairs
pub const BUILTIN_STUBS: &[(&str, &str)] = &[("model", MODEL_STUB), ("migration", MIGRATION_STUB)];

/// Placeholders each built-in stub expects
#[must_use]
pub fn placeholders(id: &str) -> &'static [&'static str] {
    match id {
        "model" => &[
            "namespace",
            "imports",
            "class",
            "table",
            "fillable",
            "hidden",
            "casts",
            "relations",
        ],
        "migration" => &["table", "columns"],
        _ => &[],
    }
}
